use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metconvert")]
#[command(about = "Convert surface observations and WRF fields to MET verification inputs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a station observation source to MET point records
    Station {
        #[arg(short, long, help = "Input station source file (JSON)")]
        input: PathBuf,

        #[arg(
            long,
            value_delimiter = ',',
            default_value = "temperature,dewpoint,U,V,RH,PSFC",
            help = "Variables to derive, in output order"
        )]
        variables: Vec<String>,

        #[arg(short, long, help = "Output file path [default: stdout]")]
        output: Option<PathBuf>,

        #[arg(
            long,
            value_delimiter = ',',
            help = "QC flags that allow a record to be emitted [default: C,S,V,G,K,O]"
        )]
        accept_flags: Option<Vec<char>>,

        #[arg(long, default_value = "false", help = "Pretty-print the output JSON")]
        pretty: bool,
    },

    /// Convert one variable of a gridded model source to a MET grid field
    Grid {
        #[arg(short, long, help = "Input gridded source file (JSON)")]
        input: PathBuf,

        #[arg(long, help = "Variable to derive (T2, DPT, U10, V10, RH, PSFC, WIND)")]
        variable: String,

        #[arg(short, long, help = "Output file path [default: stdout]")]
        output: Option<PathBuf>,

        #[arg(long, help = "Pin grid x coordinate [default: 87.5]")]
        x_pin: Option<f64>,

        #[arg(long, help = "Pin grid y coordinate [default: 77.0]")]
        y_pin: Option<f64>,

        #[arg(long, default_value = "false", help = "Pretty-print the output JSON")]
        pretty: bool,
    },
}
