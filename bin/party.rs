//! party - maintain the party database and invoice counter.
//!
//! # Usage
//!
//! ```bash
//! # Show a party's address and GSTIN
//! party show "Acme Traders"
//!
//! # Add or update a party, optionally with a private mark
//! party set "Acme Traders" "12 Market Rd, Bangalore" 29ABCDE1234F1Z5 --mark AT
//!
//! # Point a private mark at a party
//! party mark "Acme Traders" AT
//!
//! # Find the party behind a private mark
//! party lookup AT
//!
//! # List every private mark
//! party marks
//!
//! # Print (and optionally bump) the invoice counter
//! party invoice --increment
//! ```

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use bill_tools::{logging, Config, InvoiceCounter, PartyDatabase};

/// Party database maintenance.
#[derive(Parser)]
#[command(name = "party")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a party's address and GSTIN
    Show {
        name: String,
    },

    /// Add or update a party
    Set {
        name: String,
        address: String,
        tin: String,

        /// Private mark to point at this party
        #[arg(short, long)]
        mark: Option<String>,
    },

    /// Point a private mark at a party
    Mark {
        name: String,
        mark: String,
    },

    /// Find the party behind a private mark
    Lookup {
        mark: String,
    },

    /// List every private mark
    Marks,

    /// Show the latest invoice number
    Invoice {
        /// Advance the counter by one first
        #[arg(long)]
        increment: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    logging::init(&config)?;

    let db = PartyDatabase::from_config(&config);

    match cli.command {
        Commands::Show { name } => match db.party_details(&name)? {
            Some(record) => {
                println!("{}", name);
                println!("  Address : {}", record.address);
                println!("  GSTIN   : {}", record.tin);
            }
            None => bail!("Unknown party: {}", name),
        },
        Commands::Set { name, address, tin, mark } => {
            db.set_party_details(&name, &address, &tin, mark.as_deref())?;
            println!("✓ Saved {}", name);
        }
        Commands::Mark { name, mark } => {
            if db.party_details(&name)?.is_none() {
                bail!("Unknown party: {}", name);
            }
            db.set_private_mark(&name, &mark)?;
            println!("✓ {} → {}", mark, name);
        }
        Commands::Lookup { mark } => match db.name_by_mark(&mark)? {
            Some(name) => println!("{}", name),
            None => bail!("Unknown private mark: {}", mark),
        },
        Commands::Marks => {
            for mark in db.all_marks()? {
                println!("{}", mark);
            }
        }
        Commands::Invoice { increment } => {
            let counter = InvoiceCounter::new(&config.invoice_counter);
            let invoice = if increment {
                counter.increment()?
            } else {
                counter.current()?
            };
            println!("{}", invoice);
        }
    }

    Ok(())
}
