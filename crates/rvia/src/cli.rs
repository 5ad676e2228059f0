//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "rvia")]
#[command(about = "RISC-V instruction analysis - add-immediate and memory operand facts")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (logs every analysis decision)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode instruction words and report what the analyses conclude
    Analyze {
        /// Instruction words in hex (e.g. 0xf8010083)
        #[arg(value_name = "WORD")]
        words: Vec<String>,

        /// Raw little-endian code file to analyze word by word
        #[arg(long, value_name = "FILE", conflicts_with = "words")]
        bin: Option<PathBuf>,

        /// Register width
        #[arg(long, value_enum, default_value = "64")]
        xlen: XlenArg,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the opcode classification table
    Opcodes {
        /// Register width (hides opcodes unavailable on it)
        #[arg(long, value_enum, default_value = "64")]
        xlen: XlenArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum XlenArg {
    #[value(name = "32")]
    Rv32,
    #[value(name = "64")]
    Rv64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned human-readable lines
    Text,
    /// One `key=value` record per instruction
    Kv,
}
