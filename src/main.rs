// gst-codes - write the numbered GST code report from the party database

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use bill_tools::{generate, logging, Config};

/// Merge addresses.json with pvtaddresses.json into a numbered CSV of GSTINs.
#[derive(Parser)]
#[command(name = "gst-codes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address book: name -> [address, tin] (default: <BILL_DATABASE_DIR>/addresses.json)
    #[arg(long)]
    addresses: Option<PathBuf>,

    /// Private marks: mark -> party (default: <BILL_DATABASE_DIR>/pvtaddresses.json)
    #[arg(long)]
    private_marks: Option<PathBuf>,

    /// Report to write (default: GST_CODES_OUTPUT or generated_gst_codes.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    logging::init(&config)?;

    let addresses = cli.addresses.unwrap_or_else(|| config.addresses_path());
    let private_marks = cli.private_marks.unwrap_or_else(|| config.private_marks_path());
    let output = cli.output.unwrap_or_else(|| config.codes_output.clone());

    println!("🏷️  GST codes: {} + {}", addresses.display(), private_marks.display());

    let rows = generate(&addresses, &private_marks, &output)?;

    println!("✓ Wrote {} parties to {}", rows, output.display());
    Ok(())
}
