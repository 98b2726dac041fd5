//! pomotray - a Pomodoro timer living in the system tray
//!
//! `pomotray daemon` owns the timer and the tray icon:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 pomodoros
//!
//! Every other subcommand talks to the daemon over a Unix socket.

use std::path::Path;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use pomotray::cli::{Cli, Commands, Display, IpcClient, STOP_CONFIRMATION};
use pomotray::config::ConfigStore;
use pomotray::daemon::{self, default_socket_path, DaemonOptions};

/// Main entry point
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the daemon on this thread, or any other command on a small runtime.
fn run(cli: Cli) -> Result<()> {
    if let Some(Commands::Daemon { floating }) = cli.command {
        // the tray needs the main thread, so the daemon builds its own runtime
        return daemon::run(DaemonOptions {
            store: config_store(cli.config.as_deref())?,
            socket_path: default_socket_path(),
            floating,
        });
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute(cli))
}

fn config_store(path: Option<&Path>) -> Result<ConfigStore> {
    match path {
        Some(path) => Ok(ConfigStore::new(path)),
        None => Ok(ConfigStore::at_default_location()?),
    }
}

/// Executes a client-side CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let Cli {
        command,
        verbose,
        config,
    } = cli;
    if verbose {
        tracing::info!("Verbose mode enabled");
    }

    let client = IpcClient::new();
    match command {
        Some(Commands::Start) => Display::show_result(&client.start().await?),
        Some(Commands::Toggle) => Display::show_result(&client.toggle().await?),
        Some(Commands::Pause) => Display::show_result(&client.pause().await?),
        Some(Commands::Resume) => Display::show_result(&client.resume().await?),
        Some(Commands::Stop { yes }) => {
            if !yes && is_active(&client).await? && !Display::confirm(STOP_CONFIRMATION)? {
                println!("Timer left running");
                return Ok(());
            }
            Display::show_result(&client.stop().await?);
        }
        Some(Commands::Status) => Display::show_status(&client.status().await?),
        Some(Commands::Floating) => Display::show_result(&client.toggle_floating().await?),
        Some(Commands::Configure(args)) => {
            let response = client.configure(args.to_params()).await?;
            Display::show_result(&response);
            if let Some(data) = &response.data {
                if let Some(settings) = &data.settings {
                    // the daemon may have been started with another --config
                    Display::show_settings(settings, data.config_path.as_deref().map(Path::new));
                }
            }
        }
        Some(Commands::Config) => {
            let store = config_store(config.as_deref())?;
            Display::show_settings(&store.load(), Some(store.path()));
        }
        Some(Commands::Quit) => Display::show_result(&client.quit().await?),
        Some(Commands::Completions { shell }) => generate_completions(shell),
        Some(Commands::Daemon { .. }) => anyhow::bail!("the daemon must run on the main thread"),
        None => Cli::command().print_help()?,
    }

    Ok(())
}

/// Returns true if the daemon reports a running or paused timer.
async fn is_active(client: &IpcClient) -> Result<bool> {
    let response = client.status().await?;
    Ok(response
        .data
        .and_then(|d| d.activity)
        .is_some_and(|activity| activity != "idle"))
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
