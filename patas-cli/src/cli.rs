use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eyre::{eyre, Result};
use patas_core::{AnimalSex, AnimalSize, AnimalStatus, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "patas")]
#[command(about = "Patas Unidas client: report stray animals and find them nearby")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL
    #[arg(long, global = true, env = "PATAS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "PATAS_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Directory holding the saved session (default: <data dir>/patas)
    #[arg(long, global = true, env = "PATAS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log SDK debug output to stderr (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// `--data-dir`, else the platform data directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join("patas"))
                .ok_or_else(|| eyre!("no platform data directory, pass --data-dir")),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and save the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PATAS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (does not log in)
    Register(RegisterArgs),
    /// Forget the saved session
    Logout,
    /// Show the saved session
    Whoami,
    /// List animals near a location
    Feed {
        #[command(flatten)]
        at: Location,
    },
    /// Show, report, edit or delete animals
    Animal {
        #[command(subcommand)]
        action: AnimalCommands,
    },
    /// Show or change your profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "PATAS_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub city: String,
    /// State (UF), e.g. MG
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub phone: String,
}

#[derive(Args, Clone, Copy)]
pub struct Location {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub long: f64,
}

#[derive(Subcommand)]
pub enum AnimalCommands {
    /// Show one animal
    Show {
        id: u64,
        /// Your latitude, to show the distance
        #[arg(long, allow_hyphen_values = true, requires = "long")]
        lat: Option<f64>,
        /// Your longitude, to show the distance
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        long: Option<f64>,
    },
    /// Report an animal
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// JPEG file; repeat for more photos
        #[arg(long = "photo", required = true)]
        photos: Vec<PathBuf>,
        #[command(flatten)]
        at: Location,
    },
    /// Edit an animal; omitted fields keep their value
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        age: Option<String>,
        /// e.g. AVAILABLE_FOR_ADOPTION
        #[arg(long)]
        status: Option<AnimalStatus>,
        /// SMALL, MEDIUM or LARGE
        #[arg(long)]
        size: Option<AnimalSize>,
        /// MALE, FEMALE or UNKNOWN
        #[arg(long)]
        sex: Option<AnimalSex>,
        /// Replace the photos with this JPEG
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Delete an animal you reported
    Delete { id: u64 },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile
    Show,
    /// Upload a JPEG as your profile picture
    SetPhoto { path: PathBuf },
    /// Remove your profile picture
    DeletePhoto,
}
