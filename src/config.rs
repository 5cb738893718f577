// ⚙️ Configuration - environment driven
// Loaded once per binary, after `dotenvy::dotenv()` has had a chance to fill the env.
//
// Variables (all optional):
// - BILL_BASE_PATH        base directory the spreadsheet app opens bills from (default: Z:\new-app)
// - BILL_DATABASE_DIR     directory holding addresses.json / pvtaddresses.json (default: .)
// - BILL_INVOICE_COUNTER  invoice counter file (default: savename.txt)
// - GST_CODES_OUTPUT      code generator output (default: generated_gst_codes.csv)
// - BILL_POWERSHELL       PowerShell executable used for COM automation (default: powershell)
// - RUST_LOG              log filter (default: info)
// - LOG_FORMAT            text | json (default: text)

use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_PATH: &str = r"Z:\new-app";
pub const ADDRESSES_FILE: &str = "addresses.json";
pub const PRIVATE_MARKS_FILE: &str = "pvtaddresses.json";
pub const DEFAULT_CODES_OUTPUT: &str = "generated_gst_codes.csv";
pub const DEFAULT_INVOICE_COUNTER: &str = "savename.txt";

// ============================================================================
// LOG FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("Unsupported LOG_FORMAT '{}' (expected text or json)", other),
        }
    }
}

// ============================================================================
// CONFIG
// ============================================================================

/// Settings shared by the `gst-codes`, `print-bill` and `party` binaries.
#[derive(Debug, Clone)]
pub struct Config {
    /// Windows directory the spreadsheet application resolves bill paths against
    pub base_path: String,

    /// Directory holding the party database files
    pub database_dir: PathBuf,

    /// Latest invoice number lives here
    pub invoice_counter: PathBuf,

    /// Where the GST code report is written
    pub codes_output: PathBuf,

    /// PowerShell host used to reach Excel over COM
    pub powershell: String,

    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_format = match get("LOG_FORMAT") {
            Some(value) => LogFormat::parse(&value)?,
            None => LogFormat::Text,
        };

        Ok(Config {
            base_path: get("BILL_BASE_PATH").unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            database_dir: get("BILL_DATABASE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            invoice_counter: get("BILL_INVOICE_COUNTER")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INVOICE_COUNTER)),
            codes_output: get("GST_CODES_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CODES_OUTPUT)),
            powershell: get("BILL_POWERSHELL").unwrap_or_else(|| "powershell".to_string()),
            log_level: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format,
        })
    }

    /// Mapping A: party name -> [address, tin]
    pub fn addresses_path(&self) -> PathBuf {
        self.database_dir.join(ADDRESSES_FILE)
    }

    /// Mapping B: private mark -> party
    pub fn private_marks_path(&self) -> PathBuf {
        self.database_dir.join(PRIVATE_MARKS_FILE)
    }
}

// ============================================================================
// TESTS
// ============================================================================
