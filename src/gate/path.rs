//! Request path canonicalization.
//!
//! Classification runs on the same path the file server and router end up
//! resolving: percent-decoded, with empty and `.` segments dropped. `..` is
//! refused outright.

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Percent-decoding produced invalid UTF-8
    InvalidEncoding,
    /// Path contains a `..` segment
    ParentSegment,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::InvalidEncoding => write!(f, "Path is not valid UTF-8 once decoded"),
            PathError::ParentSegment => write!(f, "Path contains a parent segment"),
        }
    }
}

impl std::error::Error for PathError {}

/// Canonical form of a request path. A trailing `/` survives so directory
/// URLs keep their shape.
pub fn canonical_path(raw: &str) -> Result<String, PathError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| PathError::InvalidEncoding)?;

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(PathError::ParentSegment),
            s => segments.push(s),
        }
    }

    let mut canonical = format!("/{}", segments.join("/"));
    if !segments.is_empty() && decoded.ends_with('/') {
        canonical.push('/');
    }
    Ok(canonical)
}
