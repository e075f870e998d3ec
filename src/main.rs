use clap::Parser;
use fanzone_gate::ServerConfig;
use fanzone_gate::cli::{
    Args, build_evaluator, init_logging, load_routes, select_allowed_origin, timezone_options,
    validate_static_dir,
};
use fanzone_gate::run_server;
use fanzone_gate::timezone::resolve_timezone;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(evaluator) = build_evaluator(args.auth_strategy, args.jwt_secret_file.as_deref())
    else {
        std::process::exit(1);
    };

    let Some(allowed_origin) = select_allowed_origin(
        args.environment,
        args.production_origin.as_deref(),
        &args.development_origin,
    ) else {
        std::process::exit(1);
    };

    let Some(routes) = load_routes(args.routes_file.as_deref()) else {
        std::process::exit(1);
    };

    let Some(static_dir) = validate_static_dir(args.static_dir.clone()) else {
        std::process::exit(1);
    };

    let timezone = resolve_timezone(&timezone_options(&args)).await;

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener.local_addr().unwrap_or_else(|e| {
        error!(error = %e, "Failed to read local address");
        std::process::exit(1);
    });

    let config = ServerConfig {
        environment: args.environment,
        allowed_origin,
        evaluator,
        routes,
        static_dir,
        timezone,
    };

    info!(address = %local_addr, "Listening");

    if let Err(e) = run_server(config, listener).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
