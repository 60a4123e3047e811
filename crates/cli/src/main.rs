use std::sync::Arc;

use bolnica_core::constants::API_BASE_URL_ENV;
use bolnica_core::{
    client_config_from_env_value, AdminError, AssumeYes, Prompter, RecordId, Removal, ScreenKind,
    ScreenOps, Session, Submitted, TerminalPrompter,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bolnica")]
#[command(about = "Hospital records administration CLI")]
struct Cli {
    /// Base URL of the records service (overrides BOLNICA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the records of a screen
    List {
        /// bolnice, dijagnoze, odeljenja or pacijenti
        screen: ScreenKind,
        /// Case-insensitive text filter
        #[arg(long)]
        filter: Option<String>,
    },
    /// Create a record
    Create {
        screen: ScreenKind,
        /// Form field assignment, e.g. --set name=Opšta
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Update a record, starting from its current values
    Update {
        screen: ScreenKind,
        id: RecordId,
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Delete a record
    Delete {
        screen: ScreenKind,
        id: RecordId,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Show the choices for a screen's reference fields
    Options { screen: ScreenKind },
    /// Show the form fields of a screen
    Fields { screen: ScreenKind },
}

/// Parse `field=value`. The value may be empty or contain further `=` signs.
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bolnica_core=warn".parse()?)
                .add_directive("bolnica_cli=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'bolnica --help' for commands");
        return Ok(());
    };

    let api_url = cli.api_url.or_else(|| std::env::var(API_BASE_URL_ENV).ok());
    let cfg = Arc::new(client_config_from_env_value(api_url)?);

    let prompter: Arc<dyn Prompter> = match &command {
        Commands::Delete { yes: true, .. } => Arc::new(AssumeYes),
        _ => Arc::new(TerminalPrompter::new(TerminalPrompter::stdin_lines())),
    };
    let session = Session::connect(cfg, prompter)?;

    match command {
        Commands::List { screen, filter } => {
            let screen = open_settled(&session, screen).await?;
            if let Some(filter) = filter {
                screen.set_filter(&filter);
            }
            let rows = screen.rows();
            if rows.is_empty() {
                println!("No records found.");
            }
            for row in rows {
                println!("{row}");
            }
        }
        Commands::Create { screen, set } => {
            let mut screen = session.open(screen).await;
            fill_and_submit(screen.as_mut(), &set).await?;
        }
        Commands::Update { screen, id, set } => {
            let mut screen = open_settled(&session, screen).await?;
            screen.begin_edit(id)?;
            fill_and_submit(screen.as_mut(), &set).await?;
        }
        Commands::Delete { screen, id, .. } => {
            let mut screen = open_settled(&session, screen).await?;
            match screen.remove(id).await? {
                Removal::Deleted(id) => println!("Deleted {} #{id}", screen.kind()),
                Removal::Declined => {
                    tracing::info!(screen = %screen.kind(), %id, "delete declined");
                    println!("Cancelled.");
                }
            }
        }
        Commands::Options { screen } => {
            let screen = session.open(screen).await;
            let options = screen.options();
            if options.is_empty() {
                println!("{} has no reference fields.", screen.kind().title());
            }
            for field in options {
                println!("{}:", field.field);
                for (id, label) in field.options {
                    println!("  {id}\t{label}");
                }
            }
        }
        Commands::Fields { screen } => {
            let screen = session.open(screen).await;
            for field in screen.fields() {
                println!("{field}");
            }
        }
    }

    Ok(())
}

async fn open_settled(session: &Session, kind: ScreenKind) -> anyhow::Result<Box<dyn ScreenOps>> {
    let screen = session.open(kind).await;
    if let Err(err) = screen.settled().await {
        tracing::error!(screen = %kind, "could not load the list: {err}");
        return Err(err.into());
    }
    Ok(screen)
}

async fn fill_and_submit(
    screen: &mut dyn ScreenOps,
    assignments: &[(String, String)],
) -> anyhow::Result<()> {
    for (field, value) in assignments {
        screen.assign(field, value)?;
    }

    match screen.submit().await {
        Ok(Submitted::Created) => println!("Created {}.", screen.kind()),
        Ok(Submitted::Updated(id)) => println!("Updated {} #{id}.", screen.kind()),
        Err(err @ AdminError::Validation(_)) => {
            tracing::warn!(screen = %screen.kind(), "form rejected: {err}");
            eprintln!("{}", screen.form_summary());
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
