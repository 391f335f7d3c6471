//! CLI entry point - the composition root.
//!
//! Parses arguments, initialises logging, bootstraps the backend and client,
//! then routes the command to its handler.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use dlsync_cli::handlers::bulk::BulkAction;
use dlsync_cli::handlers::control::TaskAction;
use dlsync_cli::handlers::history::HistoryAction;
use dlsync_cli::{Cli, CliConfig, CliContext, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command.take() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig::from_cli(&cli)).await?;
    let result = dispatch(&ctx, command).await;
    ctx.shutdown().await;
    result
}

async fn dispatch(ctx: &CliContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => handlers::list::execute(ctx).await,
        Commands::Add { url, dest, name } => {
            handlers::add::execute(ctx, &url, &dest, name.as_deref()).await
        }
        Commands::Pause { id } => handlers::control::execute(ctx, TaskAction::Pause, &id).await,
        Commands::Resume { id } => handlers::control::execute(ctx, TaskAction::Resume, &id).await,
        Commands::Cancel { id } => handlers::control::execute(ctx, TaskAction::Cancel, &id).await,
        Commands::Remove { id } => handlers::control::execute(ctx, TaskAction::Remove, &id).await,
        Commands::PauseAll => handlers::bulk::execute(ctx, BulkAction::PauseAll).await,
        Commands::ResumeAll => handlers::bulk::execute(ctx, BulkAction::ResumeAll).await,
        Commands::CancelAll => handlers::bulk::execute(ctx, BulkAction::CancelAll).await,
        Commands::ClearFinished => handlers::bulk::execute(ctx, BulkAction::ClearFinished).await,
        Commands::RetryFailed => handlers::bulk::execute(ctx, BulkAction::RetryFailed).await,
        Commands::SpeedLimit { bytes_per_sec } => {
            handlers::settings::speed_limit(ctx, bytes_per_sec).await
        }
        Commands::MaxConcurrent { max } => handlers::settings::max_concurrent(ctx, max).await,
        Commands::History {
            search,
            clear,
            older_than,
        } => {
            let action = match (clear, search) {
                (true, _) => HistoryAction::Clear { older_than },
                (false, Some(query)) => HistoryAction::Search(query),
                (false, None) => HistoryAction::Show,
            };
            handlers::history::execute(ctx, action).await
        }
        Commands::Disk { path, required } => handlers::disk::execute(ctx, &path, required).await,
        Commands::Watch => handlers::watch::execute(ctx).await,
    }
}
