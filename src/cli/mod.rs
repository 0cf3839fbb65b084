use clap::{Parser, Subcommand};

pub mod handlers;
pub mod repl;

pub use handlers::dispatch;
pub use repl::{ReplCommand, parse_command};

/// `Salience` - adaptive context framework demo.
#[derive(Parser, Debug)]
#[command(name = "salience")]
#[command(version = "0.1.0")]
#[command(
    about = "Observe session state, derive context, and compile the system prompt.",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the observer's derived variables for a route as JSON
    Observe {
        /// Route to observe (default: demo.default_route)
        #[arg(short, long)]
        route: Option<String>,
    },

    /// Print the compiled system prompt for a route
    Prompt {
        /// Route to compile for (default: demo.default_route)
        #[arg(short, long)]
        route: Option<String>,
    },

    /// Run a single conversation turn
    Chat {
        /// Route the conversation happens on (default: demo.default_route)
        #[arg(short, long)]
        route: Option<String>,

        /// User message to send
        #[arg(short, long)]
        message: String,

        /// Skip the artificial reply delay
        #[arg(long)]
        no_delay: bool,
    },

    /// List the recommended conversion actions for a route
    Actions {
        /// Route to list actions for (default: demo.default_route)
        #[arg(short, long)]
        route: Option<String>,
    },

    /// Start an interactive session (type /help for commands)
    Repl {
        /// Starting route (default: demo.default_route)
        #[arg(short, long)]
        route: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        config_command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Write a default config file to ~/.salience/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration (file + environment)
    Show,
}
