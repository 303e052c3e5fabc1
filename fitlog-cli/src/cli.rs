use clap::{Parser, Subcommand};
use fitlog::domain::Intensity;

#[derive(Debug, Parser)]
#[command(name = "fitlog-cli")]
#[command(about = "Command-line client for the fitlog activity API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and store the session locally
    Login {
        /// Account email; prompted for when omitted
        email: Option<String>,
    },
    /// Create a new account (sign in afterwards)
    Register {
        /// Account email; prompted for when omitted
        email: Option<String>,
    },
    /// Remove the stored session
    Logout,
    /// Show whether a session is stored, and for whom
    Status,
    /// List all activities
    List,
    /// Show a single activity
    Show { id: i64 },
    /// Record a new activity
    Add {
        /// Kind of activity, e.g. "Running"
        #[arg(long = "type")]
        activity_type: String,
        /// Duration in minutes
        #[arg(long)]
        duration: u32,
        /// Date as YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Baja, Media or Alta
        #[arg(long, default_value = "Media")]
        intensity: Intensity,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Update fields of an existing activity
    Edit {
        id: i64,
        #[arg(long = "type")]
        activity_type: Option<String>,
        /// Duration in minutes
        #[arg(long)]
        duration: Option<u32>,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Baja, Media or Alta
        #[arg(long)]
        intensity: Option<Intensity>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an activity
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
