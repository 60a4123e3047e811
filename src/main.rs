use std::io::Write;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bolnica_core::constants::API_BASE_URL_ENV;
use bolnica_core::{Session, TerminalPrompter, client_config_from_env_value};

mod console;

use console::{Command, Console, Flow, HELP};

/// Interactive console for the hospital records service
///
/// Opens one screen at a time and reads commands from standard input until `quit` or end of
/// input. Confirmations are asked on the same terminal.
///
/// # Environment Variables
/// - `BOLNICA_API_URL`: base URL of the records service (default: "http://localhost:8080")
/// - `RUST_LOG`: log filter, on top of `bolnica_core=info` and `bolnica_run=info`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bolnica_core=info".parse()?)
                .add_directive("bolnica_run=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = Arc::new(client_config_from_env_value(
        std::env::var(API_BASE_URL_ENV).ok(),
    )?);

    tracing::info!("++ Starting bolnica console against {}", cfg.base_url());

    let lines = TerminalPrompter::stdin_lines();
    let prompter = Arc::new(TerminalPrompter::new(lines.clone()));
    let session = Session::connect(cfg, prompter)?;
    let mut console = Console::new(session, std::io::stdout());

    println!("{HELP}");
    loop {
        print!("bolnica> ");
        std::io::stdout().flush()?;

        // The prompter locks the same reader for confirmations.
        let line = {
            let mut lines = lines.lock().await;
            lines.next_line().await?
        };
        let Some(line) = line else {
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(console::CommandError::Empty) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match console.execute(command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => tracing::error!("command failed: {err:#}"),
        }
    }

    Ok(())
}
