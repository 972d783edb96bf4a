//! publish - upload a CI-built release binary to its GitHub release.

use publish_dist::cli;
use publish_dist::cli::OutputManager;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false);
            output.error(&format!("{} failed: {e}", e.step()));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.indent("Recovery suggestions:");
                for suggestion in suggestions {
                    output.indent(&format!("• {}", suggestion));
                }
            }

            process::exit(1);
        }
    }
}
