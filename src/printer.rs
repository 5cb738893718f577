// 🖨️ Bill Printer - send every sheet of a bill workbook to the printer
//
// 1. read sheet names from the local file (fails before any automation call)
// 2. resolve the path the spreadsheet application opens: <base>\<relative>
// 3. launch, show, open, select sheets, print
// 4. close without saving, quit; also on every error path

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::automation::{ExcelSession, SpreadsheetAutomation};
use crate::workbook;

// ============================================================================
// PATHS
// ============================================================================

/// Join a relative bill path onto a Windows base directory with `\`.
pub fn application_path(base_path: &str, relative: &Path) -> String {
    let base = base_path.trim_end_matches(&['\\', '/'][..]);
    let relative = relative.to_string_lossy().replace('/', "\\");
    let relative = relative.trim_start_matches('\\');

    if base.is_empty() {
        relative.to_string()
    } else {
        format!("{}\\{}", base, relative)
    }
}

// ============================================================================
// PRINT JOB
// ============================================================================

/// Everything known about one print request before the application starts.
#[derive(Debug, Clone)]
pub struct PrintJob {
    /// Path as given on the command line, resolved locally
    pub local_path: PathBuf,

    /// Path handed to the spreadsheet application
    pub application_path: String,

    pub sheet_names: Vec<String>,
    pub started_at: DateTime<Utc>,
}

impl PrintJob {
    /// Validate the workbook and build the job.
    pub fn prepare(relative: &Path, base_path: &str) -> Result<Self> {
        let sheet_names = workbook::sheet_names(relative)?;

        Ok(PrintJob {
            local_path: relative.to_path_buf(),
            application_path: application_path(base_path, relative),
            sheet_names,
            started_at: Utc::now(),
        })
    }

    /// Drive the application through the job.
    pub fn run(&self, app: &mut dyn SpreadsheetAutomation) -> Result<()> {
        tracing::info!(
            file = %self.local_path.display(),
            sheets = self.sheet_names.len(),
            backend = app.backend(),
            "Printing workbook"
        );

        let mut session = ExcelSession::start(app)?;
        session.set_visible(true)?;

        let mut workbook = session.open_workbook(&self.application_path)?;
        workbook.select_sheets(&self.sheet_names)?;
        workbook.print_selection()?;
        workbook.close()?;

        session.quit()?;

        let elapsed = Utc::now() - self.started_at;
        tracing::info!(
            file = %self.local_path.display(),
            elapsed_ms = elapsed.num_milliseconds(),
            "Print job sent"
        );
        Ok(())
    }
}

/// Validate `relative`, then print all of its sheets through `app`.
pub fn print_file(relative: &Path, base_path: &str, app: &mut dyn SpreadsheetAutomation) -> Result<()> {
    PrintJob::prepare(relative, base_path)?.run(app)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::{AutomationCall, RecordingAutomation};
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn bill(dir: &TempDir, sheets: &[&str]) -> PathBuf {
        let path = dir.path().join("bill.xlsx");
        let mut workbook = Workbook::new();
        for sheet in sheets {
            workbook.add_worksheet().set_name(*sheet).unwrap();
        }
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_application_path_joins_with_backslash() {
        assert_eq!(
            application_path(r"Z:\new-app", Path::new("bills/2024/42.xlsx")),
            r"Z:\new-app\bills\2024\42.xlsx"
        );
    }

    #[test]
    fn test_application_path_trims_separators() {
        assert_eq!(
            application_path(r"Z:\new-app\", Path::new("42.xlsx")),
            r"Z:\new-app\42.xlsx"
        );
        assert_eq!(application_path("", Path::new("42.xlsx")), "42.xlsx");
    }

    #[test]
    fn test_full_call_sequence() {
        let dir = TempDir::new().unwrap();
        let path = bill(&dir, &["Page 1", "Page 2"]);
        let mut app = RecordingAutomation::new();

        print_file(&path, r"Z:\new-app", &mut app).unwrap();

        let expected_path = application_path(r"Z:\new-app", &path);
        assert_eq!(
            app.calls(),
            &[
                AutomationCall::Launch,
                AutomationCall::SetVisible(true),
                AutomationCall::OpenWorkbook(expected_path),
                AutomationCall::SelectSheets(vec!["Page 1".to_string(), "Page 2".to_string()]),
                AutomationCall::PrintSelection,
                AutomationCall::CloseWorkbook { save_changes: false },
                AutomationCall::Quit,
            ]
        );
    }

    #[test]
    fn test_missing_file_makes_no_automation_calls() {
        let dir = TempDir::new().unwrap();
        let mut app = RecordingAutomation::new();

        let result = print_file(&dir.path().join("missing.xlsx"), r"Z:\new-app", &mut app);

        assert!(result.is_err());
        assert!(app.calls().is_empty());
    }

    #[test]
    fn test_print_failure_still_closes_and_quits() {
        let dir = TempDir::new().unwrap();
        let path = bill(&dir, &["Page 1"]);
        let mut app = RecordingAutomation::failing_on(AutomationCall::PrintSelection);

        let err = print_file(&path, r"Z:\new-app", &mut app).unwrap_err();
        assert!(err.to_string().contains("PrintSelection"));

        let calls = app.calls();
        assert_eq!(calls.len(), 7);
        assert_eq!(calls[5], AutomationCall::CloseWorkbook { save_changes: false });
        assert_eq!(calls[6], AutomationCall::Quit);
    }

    #[test]
    fn test_visible_failure_quits_without_opening() {
        let dir = TempDir::new().unwrap();
        let path = bill(&dir, &["Page 1"]);
        let mut app = RecordingAutomation::failing_on(AutomationCall::SetVisible(true));

        assert!(print_file(&path, r"Z:\new-app", &mut app).is_err());
        assert_eq!(
            app.calls(),
            &[
                AutomationCall::Launch,
                AutomationCall::SetVisible(true),
                AutomationCall::Quit,
            ]
        );
    }
}
