use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use procvar_types::{Duration, Period};

#[derive(Parser)]
#[command(
    name = "procvar",
    about = "Inspect typed process-variable values",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two periods or durations under the normalized order
    Compare(CompareArgs),
    /// Show the normalized length of a period
    Normalize(NormalizeArgs),
    /// Build a file value from a path or stdin and describe it
    File(FileArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    /// ISO-8601 period (e.g. P1M) or duration in milliseconds (e.g. 2678400000ms)
    pub left: Operand,
    /// ISO-8601 period or duration in milliseconds
    pub right: Operand,
}

#[derive(Args)]
pub struct NormalizeArgs {
    pub period: Period,
}

#[derive(Args)]
pub struct FileArgs {
    /// File to read, or `-` for stdin
    pub path: PathBuf,
    /// Name of the file value (defaults to the path's file name)
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub mime_type: Option<String>,
    #[arg(long)]
    pub encoding: Option<String>,
    /// Read chunk size in bytes
    #[arg(long)]
    pub chunk_size: Option<usize>,
}

/// A command-line operand: a period or an exact duration.
#[derive(Clone, Copy, Debug)]
pub enum Operand {
    Period(Period),
    Duration(Duration),
}

impl FromStr for Operand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(millis) = s.strip_suffix("ms") {
            return millis
                .parse::<i64>()
                .map(|millis| Self::Duration(Duration::from_millis(millis)))
                .map_err(|e| format!("invalid duration {s:?}: {e}"));
        }
        s.parse::<Period>().map(Self::Period).map_err(|e| e.to_string())
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Period(period) => write!(f, "{period}"),
            Self::Duration(duration) => write!(f, "{duration}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_parses_both_kinds() {
        assert!(matches!("P1M".parse::<Operand>(), Ok(Operand::Period(_))));
        assert!(matches!("-5ms".parse::<Operand>(), Ok(Operand::Duration(d)) if d.as_millis() == -5));
        assert!("5 days".parse::<Operand>().is_err());
        assert!("xms".parse::<Operand>().is_err());
    }

    #[test]
    fn cli_parses_compare() {
        let cli = Cli::try_parse_from(["procvar", "compare", "P1M", "P31D"]).unwrap();
        assert!(matches!(cli.command, Command::Compare(_)));
    }

    #[test]
    fn cli_rejects_bad_period() {
        assert!(Cli::try_parse_from(["procvar", "normalize", "P1X"]).is_err());
    }
}
