use anyhow::Result;
use clap::{Parser, Subcommand};
use maph_core::MaphError;
use maph_infrastructure::MaphPaths;
use std::path::PathBuf;
use std::process::ExitCode;

mod app;
mod commands;
mod logging;

use app::App;
use commands::agenda::AgendaAction;
use commands::consultation::ConsultationAction;
use commands::files::FilesAction;
use commands::patients::PatientsAction;
use commands::profile::ProfileAction;
use commands::requests::RequestAction;

#[derive(Parser)]
#[command(name = "maph")]
#[command(about = "MAPH CLI - agenda, patients and consultations for medical practices", long_about = None)]
struct Cli {
    /// Directory holding config.toml, the session and the logs
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log filter directives, e.g. `debug` or `maph_application=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        /// Identity number
        #[arg(long)]
        id: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// List the screens available to the current user
    Menu,
    /// Appointment calendar
    Agenda {
        #[command(subcommand)]
        action: AgendaAction,
    },
    /// Patient records
    Patients {
        #[command(subcommand)]
        action: PatientsAction,
    },
    /// The open consultation
    Consultation {
        #[command(subcommand)]
        action: ConsultationAction,
    },
    /// Professional profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Patient file uploads
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },
    /// Requests to support that need no account
    Request {
        #[command(subcommand)]
        action: RequestAction,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", describe(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let paths = match cli.config_dir {
        Some(dir) => MaphPaths::with_root(dir),
        None => MaphPaths::resolve()?,
    };
    let _log_guard = logging::init(&paths.log_dir(), cli.log_level.as_deref(), cli.verbose)?;
    let app = App::start(&paths).await?;

    match cli.command {
        Commands::Login { id, password } => commands::session::login(&app, &id, &password).await?,
        Commands::Logout => commands::session::logout(&app).await?,
        Commands::Whoami => commands::session::whoami(&app).await?,
        Commands::Menu => commands::session::menu(&app).await?,
        Commands::Agenda { action } => commands::agenda::run(&app, action).await?,
        Commands::Patients { action } => commands::patients::run(&app, action).await?,
        Commands::Consultation { action } => commands::consultation::run(&app, action).await?,
        Commands::Profile { action } => commands::profile::run(&app, action).await?,
        Commands::Files { action } => commands::files::run(&app, action).await?,
        Commands::Request { action } => commands::requests::run(&app, action).await?,
        Commands::Config => {
            println!("# {}", paths.config_file().display());
            print!("{}", toml::to_string_pretty(&app.config)?);
        }
    }

    Ok(())
}

/// User-facing text for a failed command.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<MaphError>() {
        Some(e) => e.user_message(),
        None => format!("{:#}", err),
    }
}
