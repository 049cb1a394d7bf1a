//! Extracts a credit report aggregate from a bureau XML file and prints it
//! as JSON, without touching the database.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use credit_report_api::extractor::parse_credit_report;
use credit_report_api::obs;

#[derive(Debug, Parser)]
#[command(name = "parse-report", about = "Print the credit report aggregate of a bureau XML file")]
struct Args {
    /// Bureau XML document to read
    file: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    obs::init_cli_tracing();
    let args = Args::parse();

    let document = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;

    let report = parse_credit_report(&document)
        .with_context(|| format!("extracting credit report from {}", args.file.display()))?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", rendered);

    Ok(())
}
