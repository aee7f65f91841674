use clap::Parser;
use tracing::debug;

use taskdesk_app::cli::Cli;
use taskdesk_app::error::AppError;
use taskdesk_app::logging::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
    debug!("CLI arguments: {:?}", cli);

    if let Err(e) = cli.run().await {
        // Action errors have already been shown by the surface
        if !matches!(e, AppError::Action(_)) {
            eprintln!("Error: {}", e);
        }
        tracing::debug!("taskdesk failed: {:?}", e);
        std::process::exit(e.exit_code());
    }
}
