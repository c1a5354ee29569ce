use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nordbook")]
#[command(about = "Drive the Nordkraft booking site from the command line")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run the browser with a visible window
    #[arg(long, global = true)]
    pub headful: bool,

    /// Path to a Chrome/Chromium executable
    #[arg(long, global = true, value_name = "PATH")]
    pub chrome: Option<PathBuf>,

    /// Site configuration overrides (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether the upstream session is logged in
    Status,

    /// Show login state and profile details
    Profile,

    /// Log in with the given credentials
    Login {
        /// Account username (falls back to NORDKRAFT_USERNAME)
        #[arg(short, long)]
        username: Option<String>,

        /// Account password (falls back to NORDKRAFT_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List currently posted timeslots for a discipline
    Timeslots {
        /// Discipline, e.g. badminton
        discipline: String,
    },

    /// Reserve the timeslot behind a listing URL
    Reserve {
        /// Listing URL of the timeslot to reserve
        url: String,
    },

    /// Capture a page on the booking site to an image file
    #[command(alias = "ss")]
    Screenshot {
        url: String,

        /// Output file path
        #[arg(short, long, default_value = "screenshot.png")]
        output: PathBuf,
    },
}
