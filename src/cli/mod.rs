pub mod daemon_path;
pub mod process;
pub mod set;
pub mod show;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use process::{daemon_executable, kill_previous_daemons, restart_daemon};
use set::{process_set_command, SetCommand};
use show::{process_show_command, ShowCommand};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::start_daemon,
    settings::store::{JsonSettingsStore, SettingsStore},
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Memento Mori", version, long_about = None)]
#[command(about = "Persistent reminder of how long you have been alive", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Start the age display daemon")]
    Init {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Save your birthdate")]
    Set {
        #[command(flatten)]
        command: SetCommand,
    },
    #[command(about = "Print your current age")]
    Show {
        #[command(flatten)]
        command: ShowCommand,
    },
    #[command(
        about = "Run the daemon directly in the current console. Used for creating a daemon internally and for debugging"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Stop a currently running daemon.")]
    Stop {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let app_dir = create_application_default_path()?;
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Init { dir } => init_daemon(dir, app_dir).await,
        Commands::Stop {} => {
            kill_previous_daemons(&daemon_executable());
            Ok(())
        }
        Commands::Serve { dir } => {
            start_daemon(dir.unwrap_or(app_dir)).await?;
            Ok(())
        }
        Commands::Set { command } => process_set_command(command, app_dir).await,
        Commands::Show { command } => process_show_command(command, app_dir).await,
    }
}

/// The daemon has nothing to count from until a birthdate exists, so refuse
/// early with a hint instead of spawning a process that exits on its own.
async fn init_daemon(dir: Option<PathBuf>, default_dir: PathBuf) -> Result<()> {
    let store = JsonSettingsStore::new(dir.clone().unwrap_or(default_dir))?;
    if !store.load().await?.birth_instant().is_set() {
        println!("Set your birthdate first: memento set \"15/06/2000\"");
        return Ok(());
    }
    restart_daemon(dir)?;
    Ok(())
}
