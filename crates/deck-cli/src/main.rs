use clap::Parser;

use deck_api::ApiClient;
use deck_cache::TaskCache;
use deck_config::DeckConfig;
use deck_core::enums::TaskStatus;

mod cli;
mod commands;
mod output;
mod session;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("tdk error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = DeckConfig::load_with_dotenv()?;

    if matches!(cli.command, cli::Commands::Serve) {
        return deck_server::serve(config).await;
    }

    let mut client = ApiClient::new(&config.api);
    if config.api.session_token.is_empty() {
        if let Some(token) = session::load() {
            client.set_session_token(Some(token));
        }
    }

    let format = cli.format;
    match cli.command {
        cli::Commands::Serve => unreachable!("handled above"),
        cli::Commands::Login { email, name } => commands::login(client, &email, &name).await,
        cli::Commands::Logout => commands::logout(client).await,
        cli::Commands::Me => commands::me(&client, format).await,
        command => {
            let mut cache = TaskCache::new(client);
            match command {
                cli::Commands::Board { page_size } => {
                    let page_size = cli::page_size_or(page_size, config.api.page_size);
                    commands::board(&mut cache, page_size, format).await
                }
                cli::Commands::List {
                    status,
                    page,
                    page_size,
                } => {
                    let page_size = cli::page_size_or(page_size, config.api.page_size);
                    commands::list(&mut cache, &status, page, page_size, format).await
                }
                cli::Commands::Show { id } => commands::show(&mut cache, id, format).await,
                cli::Commands::Create {
                    name,
                    description,
                    notes,
                    priority,
                    effort,
                    due,
                    start_by,
                } => {
                    commands::create(
                        &mut cache,
                        name,
                        description,
                        notes,
                        priority,
                        effort,
                        due.as_deref(),
                        start_by.as_deref(),
                        format,
                    )
                    .await
                }
                cli::Commands::Edit {
                    id,
                    name,
                    description,
                    notes,
                    status,
                    priority,
                    effort,
                    due,
                    start_by,
                    blocked_reason,
                } => {
                    commands::edit(
                        &mut cache,
                        id,
                        name,
                        description,
                        notes,
                        status.as_deref(),
                        priority,
                        effort,
                        due.as_deref(),
                        start_by.as_deref(),
                        blocked_reason,
                        format,
                    )
                    .await
                }
                cli::Commands::Delete { id } => commands::delete(&mut cache, id).await,
                cli::Commands::Start { id } => {
                    commands::quick(&mut cache, id, TaskStatus::InProgress, format).await
                }
                cli::Commands::Complete { id } => {
                    commands::quick(&mut cache, id, TaskStatus::Completed, format).await
                }
                cli::Commands::Block { id, reason } => {
                    commands::block(&mut cache, id, reason, format).await
                }
                cli::Commands::Unblock { id } => {
                    commands::quick(&mut cache, id, TaskStatus::InProgress, format).await
                }
                cli::Commands::Cancel { id } => {
                    commands::quick(&mut cache, id, TaskStatus::Cancelled, format).await
                }
                cli::Commands::Serve
                | cli::Commands::Login { .. }
                | cli::Commands::Logout
                | cli::Commands::Me => unreachable!("handled above"),
            }
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TASKDECK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
