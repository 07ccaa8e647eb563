//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// School transport route planner
#[derive(Debug, Parser)]
#[command(name = "busroute")]
#[command(author, version, about = "School transport route planner", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./busroute.toml when present)
    #[arg(short, long, env = "BUSROUTE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the starting point (usually the garage)
    #[command(subcommand)]
    Start(EndpointCommand),

    /// Manage the destination (usually the school)
    #[command(subcommand)]
    End(EndpointCommand),

    /// Manage enrolled students
    #[command(subcommand)]
    Students(StudentsCommand),

    /// Look up the address of a postal code (CEP)
    ///
    /// Example: busroute cep 01310-100
    Cep {
        /// Postal code, with or without the dash
        code: String,
    },

    /// Compute and inspect the itinerary
    #[command(subcommand)]
    Route(RouteCommand),
}

#[derive(Debug, Subcommand)]
pub enum EndpointCommand {
    /// Set the address
    ///
    /// Either give the street and city, or a postal code to fill them in.
    /// Example: busroute start set --postal-code 01310-100 --number 1578
    Set(AddressArgs),

    /// Show the current address
    Show,
}

#[derive(Debug, Subcommand)]
pub enum StudentsCommand {
    /// List enrolled students
    List,

    /// Enroll a student (marked as going)
    Add {
        /// Full name
        #[arg(long)]
        name: String,

        /// Contact phone
        #[arg(long)]
        phone: String,

        #[command(flatten)]
        address: AddressArgs,
    },

    /// Mark a student as going or not; toggles without a flag
    Going {
        /// Student id
        id: u64,

        /// Mark as going
        #[arg(long, conflicts_with = "off")]
        on: bool,

        /// Mark as not going
        #[arg(long)]
        off: bool,
    },

    /// Remove a student
    Remove {
        /// Student id
        id: u64,
    },
}

#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// Geocode every stop and compute a new itinerary
    Compute,

    /// Show the last computed itinerary
    Show {
        /// Print the stored itinerary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Discard the stored itinerary
    Clear,

    /// Print a Google Maps directions link for the itinerary
    Navigate,
}

/// Address fields; a postal code fills in whatever is not given explicitly
#[derive(Debug, Clone, Args)]
pub struct AddressArgs {
    /// Street name
    #[arg(long)]
    pub street: Option<String>,

    /// House number
    #[arg(long)]
    pub number: String,

    /// Neighborhood
    #[arg(long)]
    pub neighborhood: Option<String>,

    /// City
    #[arg(long)]
    pub city: Option<String>,

    /// State abbreviation
    #[arg(long)]
    pub state: Option<String>,

    /// Postal code (CEP)
    #[arg(long)]
    pub postal_code: Option<String>,
}

impl AddressArgs {
    /// Whether the postal code has to fill in street or city
    pub fn needs_autofill(&self) -> bool {
        self.postal_code.is_some() && (self.street.is_none() || self.city.is_none())
    }
}

/// Going flag requested on the command line; `None` toggles
pub const fn going_flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
