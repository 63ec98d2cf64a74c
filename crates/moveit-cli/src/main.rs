use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "moveit", version, about = "move.it - level up by taking breaks")]
struct Cli {
    /// Print events and state as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Challenge lifecycle
    Challenge {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Focus cycle countdown
    Countdown {
        #[command(subcommand)]
        action: commands::countdown::CountdownAction,
    },
    /// Level-up modal
    Modal {
        #[command(subcommand)]
        action: commands::modal::ModalAction,
    },
    /// Show level, experience and the current challenge
    Profile,
    /// Move progress in and out of cookie headers
    Cookies {
        #[command(subcommand)]
        action: commands::cookies::CookiesAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    let result = match cli.command {
        Commands::Challenge { action } => commands::challenge::run(action, json),
        Commands::Countdown { action } => commands::countdown::run(action, json),
        Commands::Modal { action } => commands::modal::run(action, json),
        Commands::Profile => commands::profile::run(json),
        Commands::Cookies { action } => commands::cookies::run(action, json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "moveit", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
