// Scoped guards over the automation surface.
//
// ExcelSession  acquired by `start`, quits the application on drop
// OpenWorkbook  borrowed from a session, closes without saving on drop
//
// The workbook borrows the session mutably, so it is always released first.

use anyhow::Result;

use super::SpreadsheetAutomation;

// ============================================================================
// SESSION
// ============================================================================

pub struct ExcelSession<'a> {
    app: &'a mut dyn SpreadsheetAutomation,
    running: bool,
}

impl<'a> ExcelSession<'a> {
    /// Launch (or attach to) the application.
    pub fn start(app: &'a mut dyn SpreadsheetAutomation) -> Result<Self> {
        tracing::debug!(backend = app.backend(), "Starting spreadsheet session");
        app.launch()?;
        Ok(ExcelSession { app, running: true })
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.app.set_visible(visible)
    }

    /// Open a workbook; it is closed when the returned guard goes away.
    pub fn open_workbook<'s>(&'s mut self, full_path: &str) -> Result<OpenWorkbook<'s, 'a>> {
        self.app.open_workbook(full_path)?;
        Ok(OpenWorkbook {
            session: self,
            open: true,
        })
    }

    /// Quit now and report the outcome.
    pub fn quit(mut self) -> Result<()> {
        self.running = false;
        self.app.quit()
    }
}

impl Drop for ExcelSession<'_> {
    fn drop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        tracing::debug!(backend = self.app.backend(), "Quitting spreadsheet application on drop");
        if let Err(e) = self.app.quit() {
            tracing::warn!(error = %e, "Failed to quit spreadsheet application");
        }
    }
}

// ============================================================================
// OPEN WORKBOOK
// ============================================================================

pub struct OpenWorkbook<'s, 'a> {
    session: &'s mut ExcelSession<'a>,
    open: bool,
}

impl OpenWorkbook<'_, '_> {
    pub fn select_sheets(&mut self, sheet_names: &[String]) -> Result<()> {
        self.session.app.select_sheets(sheet_names)
    }

    pub fn print_selection(&mut self) -> Result<()> {
        self.session.app.print_selection()
    }

    /// Close without saving and report the outcome.
    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.session.app.close_workbook(false)
    }
}

impl Drop for OpenWorkbook<'_, '_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        tracing::debug!("Closing workbook without saving on drop");
        if let Err(e) = self.session.app.close_workbook(false) {
            tracing::warn!(error = %e, "Failed to close workbook");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
