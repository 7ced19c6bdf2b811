use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

/// Arguments of the `memento-daemon` binary. Normally it is spawned through
/// `memento init`, the flags exist for running it by hand.
#[derive(Parser)]
pub struct DaemonArgs {
    /// Skip detaching and stay attached to the current console.
    #[arg(long)]
    pub force: bool,
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}
