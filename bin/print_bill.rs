// print-bill - print every sheet of an Excel bill through the desktop application

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use bill_tools::{
    logging, Config, PowerShellExcel, PrintJob, RecordingAutomation, SpreadsheetAutomation,
};

/// Print an Excel file.
#[derive(Parser)]
#[command(name = "print-bill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path to the Excel file to print.
    filepath: PathBuf,

    /// Directory the spreadsheet application resolves FILEPATH against (default: BILL_BASE_PATH)
    #[arg(long)]
    base_path: Option<String>,

    /// Log the automation calls instead of driving the application
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    logging::init(&config)?;

    let base_path = cli.base_path.unwrap_or_else(|| config.base_path.clone());

    // Validates the workbook before anything is launched
    let job = PrintJob::prepare(&cli.filepath, &base_path)?;
    println!(
        "🖨️  {} ({} sheet(s)) → {}",
        cli.filepath.display(),
        job.sheet_names.len(),
        job.application_path
    );

    let mut app: Box<dyn SpreadsheetAutomation> = if cli.dry_run {
        Box::new(RecordingAutomation::new())
    } else {
        Box::new(PowerShellExcel::new(config.powershell.clone()))
    };

    job.run(app.as_mut())?;

    println!("✓ Print job sent");
    Ok(())
}
