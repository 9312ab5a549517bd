use std::sync::Arc;

use color_eyre::Result;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use newswire::cli::{parse_args, CliCommand, USAGE};
use newswire::client::NewsClient;
use newswire::models::{SourceResult, SourceStatus};
use newswire::session::{SessionController, SessionOutcome, SessionUpdate};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so piped stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {}\n\n{}", message, USAGE);
            std::process::exit(2);
        }
    };

    match command {
        CliCommand::Version => {
            println!("newswire {}", VERSION);
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Run { base_url, params } => run_session(base_url, params).await,
    }
}

async fn run_session(base_url: String, params: newswire::models::SessionParams) -> Result<()> {
    let client = Arc::new(NewsClient::new(base_url));
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(client, update_tx);
    controller.start(params);

    let mut last_percentage = None;
    while let Some(update) = update_rx.recv().await {
        match update {
            SessionUpdate::Snapshot { progress, .. } => {
                // Only announce progress when the integer percentage moves.
                if last_percentage != Some(progress.percentage) {
                    last_percentage = Some(progress.percentage);
                    eprintln!(
                        "[{:>3}%] {}/{} sources",
                        progress.percentage, progress.completed, progress.total
                    );
                }
            }
            SessionUpdate::Terminal {
                outcome, sources, ..
            } => {
                print_results(&sources);
                return match outcome {
                    SessionOutcome::Completed {
                        total_articles,
                        sources_completed,
                    } => {
                        println!(
                            "\n{} articles from {} sources",
                            total_articles, sources_completed
                        );
                        Ok(())
                    }
                    SessionOutcome::Failed { reason } => {
                        eprintln!("Error: {}", reason);
                        std::process::exit(1);
                    }
                    SessionOutcome::Cancelled => Ok(()),
                };
            }
        }
    }

    Ok(())
}

fn print_results(sources: &[SourceResult]) {
    for result in sources {
        match result.status {
            SourceStatus::Complete => {
                println!(
                    "\n== {} ({} articles) ==",
                    result.source,
                    result.article_count()
                );
                for article in &result.articles {
                    println!("  {}", article.title);
                    println!("    {}", article.url);
                    if !article.published_date.is_empty() {
                        println!("    {}", article.published_date);
                    }
                }
            }
            SourceStatus::Empty => println!("\n== {} == no matching articles", result.source),
            SourceStatus::Timeout => println!("\n== {} == timed out", result.source),
            SourceStatus::Error => println!(
                "\n== {} == error: {}",
                result.source,
                result.message.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}
