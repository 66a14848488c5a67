//! Storefront command-line client

use std::process::ExitCode;

use storefront::{config::StorefrontConfig, observability::init_subscriber};

mod commands;

/// Storefront entry point
#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match StorefrontConfig::load() {
        Ok(config) => config,
        Err(error) => {
            // Help and version requests come through here too.
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging setup error: {error}");
        }

        return ExitCode::FAILURE;
    }

    match commands::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "user-facing error message for the command line"
            )]
            {
                eprintln!("{error}");
            }

            ExitCode::FAILURE
        }
    }
}
