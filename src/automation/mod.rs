// 🖨️ Spreadsheet Automation - the external application's control surface
//
// The application is an opaque collaborator: we only decide the order of
// calls. `session` wraps the surface in guards that always close the
// workbook and quit the application, whatever happens in between.
//
// Backends:
// - PowerShellExcel: Excel.Application over COM through a PowerShell host
// - RecordingAutomation: logs and records calls, touches nothing

pub mod powershell;
pub mod recording;
pub mod session;

pub use powershell::PowerShellExcel;
pub use recording::RecordingAutomation;
pub use session::{ExcelSession, OpenWorkbook};

use anyhow::Result;

// ============================================================================
// CALLS
// ============================================================================

/// One call into the automation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationCall {
    Launch,
    SetVisible(bool),
    OpenWorkbook(String),
    SelectSheets(Vec<String>),
    PrintSelection,
    CloseWorkbook { save_changes: bool },
    Quit,
}

// ============================================================================
// SURFACE
// ============================================================================

/// Control interface of a desktop spreadsheet application.
///
/// Calls arrive in this order for a print job:
/// launch → set_visible → open_workbook → select_sheets → print_selection
/// → close_workbook → quit. Any step may fail; the session guards still
/// issue close_workbook and quit afterwards.
pub trait SpreadsheetAutomation {
    /// Start the application or attach to a running instance
    fn launch(&mut self) -> Result<()>;

    fn set_visible(&mut self, visible: bool) -> Result<()>;

    /// Open a workbook by absolute path, as the application sees it
    fn open_workbook(&mut self, full_path: &str) -> Result<()>;

    /// Make the named sheets of the open workbook the active selection
    fn select_sheets(&mut self, sheet_names: &[String]) -> Result<()>;

    /// Send the active selection to the default printer
    fn print_selection(&mut self) -> Result<()>;

    fn close_workbook(&mut self, save_changes: bool) -> Result<()>;

    fn quit(&mut self) -> Result<()>;

    /// Backend name for log lines
    fn backend(&self) -> &'static str;
}
