use std::cmp::Ordering;
use std::io;

use anyhow::Context;
use colored::Colorize;
use procvar_file::{BuilderConfig, FileValue, FileValueBuilder};
use procvar_types::{anchor, ComparablePeriod, Period};
use serde::Serialize;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compare(args) => cmd_compare(args, &cli.format),
        Command::Normalize(args) => cmd_normalize(args, &cli.format),
        Command::File(args) => cmd_file(args, &cli.format),
    }
}

/// Order two operands. Periods are normalized; two durations compare directly.
fn compare(left: Operand, right: Operand) -> Ordering {
    match (left, right) {
        (Operand::Period(l), Operand::Period(r)) => ComparablePeriod::new(l).compare_to(r),
        (Operand::Period(l), Operand::Duration(r)) => ComparablePeriod::new(l).compare_to(r),
        (Operand::Duration(l), Operand::Period(r)) => ComparablePeriod::new(r).compare_to(l).reverse(),
        (Operand::Duration(l), Operand::Duration(r)) => l.cmp(&r),
    }
}

fn ordering_name(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "less",
        Ordering::Equal => "equal",
        Ordering::Greater => "greater",
    }
}

fn cmd_compare(args: CompareArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let ordering = compare(args.left, args.right);
    debug!(left = %args.left, right = %args.right, ?ordering, "compared operands");

    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Report {
                left: String,
                right: String,
                ordering: &'static str,
            }
            let report = Report {
                left: args.left.to_string(),
                right: args.right.to_string(),
                ordering: ordering_name(ordering),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            let symbol = match ordering {
                Ordering::Less => "<".yellow(),
                Ordering::Equal => "=".green(),
                Ordering::Greater => ">".yellow(),
            };
            println!("{} {} {}", args.left.to_string().bold(), symbol.bold(), args.right.to_string().bold());
        }
    }
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let period = ComparablePeriod::new(args.period);
    let millis = period.normalized_millis();
    let end = period.end_instant();

    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Report {
                period: Period,
                normalized_millis: String,
                end_instant: Option<String>,
            }
            let report = Report {
                period: args.period,
                normalized_millis: millis.to_string(),
                end_instant: end.map(|end| end.to_rfc3339()),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Period: {}", args.period.to_string().bold());
            println!("  Normalized: {}ms", millis.to_string().cyan());
            match end {
                Some(end) => println!("  From {}: {}", anchor().to_rfc3339(), end.to_rfc3339().cyan()),
                None => println!("  From {}: {}", anchor().to_rfc3339(), "out of range".red()),
            }
        }
    }
    Ok(())
}

fn cmd_file(args: FileArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let from_stdin = args.path.as_os_str() == "-";
    let name = match args.name {
        Some(name) => name,
        None if from_stdin => "stdin".to_string(),
        None => args
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .context("path has no file name; pass --name")?,
    };

    let mut config = BuilderConfig::default();
    if let Some(chunk_size) = args.chunk_size {
        config = config.with_chunk_size(chunk_size);
    }
    let mut builder = FileValueBuilder::new(name)?.with_config(config);
    if from_stdin {
        builder.file_stream(io::stdin())?;
    } else {
        builder
            .file_path(&args.path)
            .with_context(|| format!("reading {}", args.path.display()))?;
    }
    if let Some(mime_type) = args.mime_type {
        builder.mime_type(mime_type);
    }
    if let Some(encoding) = args.encoding {
        builder.encoding(encoding);
    }
    let value = builder.create();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&FileSummary::from(&value))?),
        OutputFormat::Text => print_file(&value),
    }
    Ok(())
}

#[derive(Serialize)]
struct FileSummary<'a> {
    filename: &'a str,
    size: usize,
    mime_type: Option<&'a str>,
    encoding: Option<&'a str>,
    charset: Option<&'static str>,
}

impl<'a> From<&'a FileValue> for FileSummary<'a> {
    fn from(value: &'a FileValue) -> Self {
        Self {
            filename: value.filename(),
            size: value.len(),
            mime_type: value.mime_type(),
            encoding: value.encoding().map(|e| e.name()),
            charset: value.charset().map(|c| c.name()),
        }
    }
}

fn print_file(value: &FileValue) {
    println!("{} {}", "✓".green().bold(), value.filename().bold());
    println!("  Type: {}", value.value_type());
    println!("  Size: {} bytes", value.len().to_string().cyan());
    println!("  MIME type: {}", value.mime_type().unwrap_or("(not set)"));
    match (value.encoding(), value.charset()) {
        (Some(encoding), Some(_)) => println!("  Encoding: {}", encoding.name().green()),
        (Some(encoding), None) => println!("  Encoding: {} {}", encoding.name().yellow(), "(unknown charset)".dimmed()),
        (None, _) => println!("  Encoding: (not set)"),
    }
}

#[cfg(test)]
mod tests {
    use procvar_types::Duration;

    use super::*;

    #[test]
    fn compare_mixed_operands() {
        let month = Operand::Period(Period::months(1));
        let days = Operand::Period(Period::days(31));
        let day_ms = Operand::Duration(Duration::from_millis(86_400_000));

        assert_eq!(compare(month, days), Ordering::Equal);
        assert_eq!(compare(day_ms, month), Ordering::Less);
        assert_eq!(compare(month, day_ms), Ordering::Greater);
        assert_eq!(compare(day_ms, day_ms), Ordering::Equal);
    }

    #[test]
    fn summary_reports_metadata() {
        let mut builder = FileValueBuilder::new("a.csv").unwrap();
        builder.file_bytes(b"1,2".to_vec()).mime_type("text/csv").encoding("latin1");
        let value = builder.create();
        let summary = FileSummary::from(&value);
        assert_eq!(summary.size, 3);
        assert_eq!(summary.encoding, Some("latin1"));
        assert_eq!(summary.charset, Some("ISO-8859-1"));
    }
}
