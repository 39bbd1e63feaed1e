use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use slicecost::domain::{AdjustmentMode, Parameter};
use slicecost::util::currency::Locale;

#[derive(Parser, Debug)]
#[command(name = "slicecost", version, about = "Cost calculator for 3D printing jobs")]
pub struct Cli {
    /// Parameter config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate the cost of a print job
    Calc(CalcArgs),

    /// Show the slicer metadata found in a G-code file
    Gcode {
        /// G-code file to read
        file: PathBuf,

        /// Print the metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or edit the pricing parameters
    Params {
        #[command(subcommand)]
        action: ParamsCommands,
    },
}

#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Filament weight in grams
    #[arg(short, long)]
    pub grams: Option<String>,

    /// Print time, whole hours
    #[arg(long)]
    pub hours: Option<String>,

    /// Print time, minutes (0-59)
    #[arg(short, long)]
    pub minutes: Option<String>,

    /// Take weight and print time from a G-code file; explicit values win
    #[arg(long)]
    pub gcode: Option<PathBuf>,

    /// Report an all-zero breakdown when weight and time are all zero
    #[arg(long)]
    pub zero_when_empty: bool,

    /// Print the breakdown as JSON
    #[arg(long, conflicts_with = "receipt")]
    pub json: bool,

    /// Print a receipt with job details and a timestamp
    #[arg(long)]
    pub receipt: bool,

    #[command(flatten)]
    pub display: DisplayArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DisplayArgs {
    /// Locale used to format amounts (en-US, en-GB, ro-RO, de-DE)
    #[arg(long, default_value = "en-US")]
    pub locale: Locale,

    /// ISO currency code
    #[arg(long, default_value = "USD")]
    pub currency: String,
}

#[derive(Subcommand, Debug)]
pub enum ParamsCommands {
    /// Show the current parameters
    Show {
        /// Print the stored layout as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the value of a parameter
    Set {
        /// Parameter name, e.g. price-per-hour
        parameter: Parameter,
        /// New non-negative value
        value: String,
    },

    /// Include a parameter in the calculation
    Enable { parameter: Parameter },

    /// Exclude a parameter from the calculation
    Disable { parameter: Parameter },

    /// Apply the markup percentage as a markup or as a discount
    Mode { mode: AdjustmentMode },

    /// Restore the default parameters
    Reset,

    /// Print the location of the config file
    Path,
}
