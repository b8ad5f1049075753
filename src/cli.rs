use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "inboxwatch", about = "Disposable mailbox + activation link watcher")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Also write a timestamped DEBUG log file for this run into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a mailbox through the provider chain and print its address
    Create,
    /// Create a mailbox, wait for the activation email and record the link
    Watch {
        /// Give up after this many seconds
        #[arg(short, long)]
        deadline: Option<u64>,

        /// Seconds between inbox checks
        #[arg(short, long)]
        interval: Option<u64>,

        /// Print the link without appending it to the result log
        #[arg(long)]
        no_save: bool,
    },
    /// Extract an activation link from a saved message file
    Extract {
        /// File holding the raw message text/markup
        #[arg(short, long)]
        file: String,

        /// Link prefix to match instead of the configured one
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// List recorded activation links
    Results,
}
