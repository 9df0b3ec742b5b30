//! Converty server
//!
//! Entry point: configuration loading, tracing setup, queue wiring and HTTP
//! server startup.

use std::sync::Arc;

use converty_convert::{build_dispatcher, OutputWorkspace};
use converty_queue::{ConversionStore, QueueRunner};
use converty_server::state::AppState;
use tokio::net::TcpListener;

mod cli;
mod tracing_setup;

use cli::CliArgs;
use tracing_setup::install_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.help_requested {
        CliArgs::print_help();
        return Ok(());
    }

    // Resolve config path: CLI > environment variable
    let config_path = args
        .config_path
        .or_else(|| std::env::var("CONVERTY_CONFIG_PATH").ok());
    let config = converty_config::load_config(config_path.as_deref())?;

    install_tracing(&config.logging);

    // Prepare the output directory up front so a bad location fails startup
    // instead of the first job.
    let workspace = OutputWorkspace::new(&config.storage.output_dir);
    workspace.ensure().await?;

    let store = Arc::new(ConversionStore::new());
    let dispatcher = Arc::new(build_dispatcher(
        workspace,
        config.conversion.image_quality,
    ));
    let runner = Arc::new(QueueRunner::new(Arc::clone(&store), dispatcher));
    let state = Arc::new(AppState::new(store, runner));

    let app = converty_server::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        output_dir = %config.storage.output_dir,
        "converty server listening"
    );

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
