use clap::Parser;
use terraformer::config::{Credentials, setup_logging};
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = terraformer::cli::CliOptions::parse();

    if let Err(err) = setup_logging(cli.debug) {
        eprintln!("Failed to set up logging: {}", err);
        return;
    }

    let state = terraformer::web::AppState::new(Credentials::from_cli(&cli));

    if let Err(err) = terraformer::web::setup_server(&cli.listen_address, cli.port, state).await {
        error!("Application error: {}", err);
    }
}
