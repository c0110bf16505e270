use crate::config::StreamSelection;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "syscap",
    version,
    about = "Run a program, capture what it writes to stdout and stderr, and report it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a program and report its captured output
    #[command(visible_alias = "r")]
    Run {
        /// Do not pass the program's output through while capturing it
        #[arg(short, long)]
        mute: bool,

        /// Which streams to capture and report
        #[arg(short, long, value_enum, default_value_t = StreamSelection::Both)]
        stream: StreamSelection,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Program to run
        program: String,

        /// Arguments passed to the program
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}
