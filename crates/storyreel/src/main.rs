//! Storyreel CLI binary.
//!
//! - Render a submission into a video
//! - Validate a submission without rendering
//! - List the available narration voices

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, list_voices, render, validate};

    // Load .env before configuration reads the API key
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    storyreel::init_tracing(cli.verbose, cli.log_format)?;

    match cli.command {
        Commands::Render {
            submission,
            poll_ms,
        } => {
            render(cli.config.as_deref(), &submission, poll_ms).await?;
        }

        Commands::Validate {
            submission,
            check_encoder,
        } => {
            validate(cli.config.as_deref(), &submission, check_encoder).await?;
        }

        Commands::Voices { json } => {
            list_voices(json)?;
        }
    }

    Ok(())
}
