use crate::profile::Profile;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "primectl",
    about = "Switch hybrid (Optimus) NVIDIA laptops between the nvidia, hybrid and intel profiles",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Use only this config file instead of /etc/primectl and ~/.config/primectl
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the current profile, OpenGL vendor and discrete GPU power state
    Status,

    /// Switch to a profile
    Configure {
        #[arg(value_enum)]
        profile: Profile,

        /// Show what would be changed without applying
        #[arg(long)]
        dry_run: bool,
    },

    /// Bring the live driver state in line with the configured profile (run at boot)
    Autoconfigure,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) {
    let shell = shell.or_else(Shell::from_env).unwrap_or_else(|| {
        eprintln!(
            "Could not detect shell. Specify one: primectl completions bash|zsh|fish|elvish|powershell"
        );
        std::process::exit(1);
    });
    clap_complete::generate(
        shell,
        &mut Cli::command(),
        "primectl",
        &mut std::io::stdout(),
    );
}
