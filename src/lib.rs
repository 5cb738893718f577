// Bill Tools - Core Library
// Shared by the gst-codes, print-bill and party binaries, and by the tests

pub mod config;
pub mod logging;
pub mod files;          // Temp-file-and-rename writes
pub mod parties;        // Party database: addresses.json + pvtaddresses.json
pub mod counter;        // Invoice counter (savename.txt)
pub mod gst_codes;      // GST code report
pub mod workbook;       // .xlsx sheet listing
pub mod automation;     // Spreadsheet automation surface + session guards
pub mod printer;        // Bill printing workflow

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use parties::{
    Addresses, PartyDatabase, PartyRecord, PrivateMarks,
    load_addresses, load_private_marks,
};
pub use counter::InvoiceCounter;
pub use gst_codes::{
    GstCodeRow, MergeError, PLACEHOLDER,
    generate, merge, render_csv, write_report,
};
pub use automation::{
    AutomationCall, ExcelSession, OpenWorkbook, PowerShellExcel,
    RecordingAutomation, SpreadsheetAutomation,
};
pub use printer::{PrintJob, application_path, print_file};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
