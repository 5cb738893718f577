// Recording backend - logs every call instead of driving an application.
// Backs `print-bill --dry-run` and the print workflow tests.

use anyhow::{bail, Result};
use std::mem;

use super::{AutomationCall, SpreadsheetAutomation};

#[derive(Debug, Default)]
pub struct RecordingAutomation {
    calls: Vec<AutomationCall>,
    fail_on: Option<AutomationCall>,
}

impl RecordingAutomation {
    pub fn new() -> Self {
        RecordingAutomation::default()
    }

    /// Fail every call of the same kind as `call` (arguments are ignored).
    pub fn failing_on(call: AutomationCall) -> Self {
        RecordingAutomation {
            calls: Vec::new(),
            fail_on: Some(call),
        }
    }

    pub fn calls(&self) -> &[AutomationCall] {
        &self.calls
    }

    fn record(&mut self, call: AutomationCall) -> Result<()> {
        tracing::info!(call = ?call, "Automation call (dry run)");

        let fails = self
            .fail_on
            .as_ref()
            .is_some_and(|f| mem::discriminant(f) == mem::discriminant(&call));
        self.calls.push(call);

        if fails {
            bail!("Simulated automation failure at {:?}", self.calls.last());
        }
        Ok(())
    }
}

impl SpreadsheetAutomation for RecordingAutomation {
    fn launch(&mut self) -> Result<()> {
        self.record(AutomationCall::Launch)
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.record(AutomationCall::SetVisible(visible))
    }

    fn open_workbook(&mut self, full_path: &str) -> Result<()> {
        self.record(AutomationCall::OpenWorkbook(full_path.to_string()))
    }

    fn select_sheets(&mut self, sheet_names: &[String]) -> Result<()> {
        self.record(AutomationCall::SelectSheets(sheet_names.to_vec()))
    }

    fn print_selection(&mut self) -> Result<()> {
        self.record(AutomationCall::PrintSelection)
    }

    fn close_workbook(&mut self, save_changes: bool) -> Result<()> {
        self.record(AutomationCall::CloseWorkbook { save_changes })
    }

    fn quit(&mut self) -> Result<()> {
        self.record(AutomationCall::Quit)
    }

    fn backend(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut app = RecordingAutomation::new();
        app.launch().unwrap();
        app.set_visible(true).unwrap();
        app.quit().unwrap();

        assert_eq!(
            app.calls(),
            &[
                AutomationCall::Launch,
                AutomationCall::SetVisible(true),
                AutomationCall::Quit
            ]
        );
    }

    #[test]
    fn test_failure_matches_kind_not_arguments() {
        let mut app = RecordingAutomation::failing_on(AutomationCall::SelectSheets(vec![]));

        assert!(app.select_sheets(&["Page 1".to_string()]).is_err());
        assert!(app.print_selection().is_ok());
        assert_eq!(app.calls().len(), 2);
    }
}
