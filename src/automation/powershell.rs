// PowerShell backend - Excel.Application over COM
//
// One long-lived `powershell -Command -` host per session. Each call is sent
// as a single line that prints an acknowledgement marker, so failures surface
// on the call that caused them:
//
//   try { <statement>; [Console]::Out.WriteLine('__ok__') }
//   catch { [Console]::Out.WriteLine('__err__ <message>') }
//
// The host outlives a failed call so the session guards can still close the
// workbook and quit Excel. Only `quit` ends it, with `exit 0`.

use anyhow::{anyhow, bail, Context, Result};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use super::{AutomationCall, SpreadsheetAutomation};

const OK_MARKER: &str = "__ok__";
const ERR_MARKER: &str = "__err__";

// ============================================================================
// SCRIPT LINES
// ============================================================================

/// Single-quoted PowerShell literal.
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// The PowerShell statement for one automation call.
pub fn statement_for(call: &AutomationCall) -> String {
    match call {
        AutomationCall::Launch => {
            "$ErrorActionPreference = 'Stop'; $excel = New-Object -ComObject Excel.Application"
                .to_string()
        }
        AutomationCall::SetVisible(visible) => {
            format!("$excel.Visible = {}", if *visible { "$true" } else { "$false" })
        }
        AutomationCall::OpenWorkbook(path) => {
            format!("$workbook = $excel.Workbooks.Open({})", ps_quote(path))
        }
        AutomationCall::SelectSheets(names) => {
            let list: Vec<String> = names.iter().map(|n| ps_quote(n)).collect();
            format!(
                "$selection = $workbook.Worksheets.Item([object[]]@({}))",
                list.join(",")
            )
        }
        AutomationCall::PrintSelection => "$selection.PrintOut()".to_string(),
        AutomationCall::CloseWorkbook { save_changes } => format!(
            "$workbook.Close({})",
            if *save_changes { "$true" } else { "$false" }
        ),
        AutomationCall::Quit => {
            "$excel.Quit(); [void][System.Runtime.InteropServices.Marshal]::ReleaseComObject($excel)"
                .to_string()
        }
    }
}

/// Wrap a statement so the host acknowledges it on stdout.
pub fn acknowledged(statement: &str) -> String {
    format!(
        "try {{ {}; [Console]::Out.WriteLine('{}') }} catch {{ [Console]::Out.WriteLine('{} ' + ($_.Exception.Message -replace '\\s+', ' ')) }}",
        statement, OK_MARKER, ERR_MARKER
    )
}

// ============================================================================
// HOST PROCESS
// ============================================================================

struct Host {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Excel driven through a PowerShell host process.
pub struct PowerShellExcel {
    program: String,
    host: Option<Host>,
}

impl PowerShellExcel {
    pub fn new(program: impl Into<String>) -> Self {
        PowerShellExcel {
            program: program.into(),
            host: None,
        }
    }

    fn spawn_host(&self) -> Result<Host> {
        let mut child = Command::new(&self.program)
            .args(["-NoLogo", "-NoProfile", "-NonInteractive", "-Command", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start PowerShell host: {}", self.program))?;

        let stdin = child.stdin.take().context("PowerShell stdin was not captured")?;
        let stdout = child.stdout.take().context("PowerShell stdout was not captured")?;

        Ok(Host {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn run(&mut self, call: AutomationCall) -> Result<()> {
        let host = self
            .host
            .as_mut()
            .ok_or_else(|| anyhow!("Excel session is not running ({:?})", call))?;

        let line = acknowledged(&statement_for(&call));
        tracing::debug!(call = ?call, "Sending automation call");

        writeln!(host.stdin, "{}", line)
            .and_then(|_| host.stdin.flush())
            .with_context(|| format!("PowerShell host is gone, cannot send {:?}", call))?;

        let mut reply = String::new();
        loop {
            reply.clear();
            let read = host
                .stdout
                .read_line(&mut reply)
                .with_context(|| format!("Failed to read PowerShell reply to {:?}", call))?;
            if read == 0 {
                bail!("PowerShell host exited before acknowledging {:?}", call);
            }

            let reply = reply.trim();
            if reply == OK_MARKER {
                return Ok(());
            }
            if let Some(message) = reply.strip_prefix(ERR_MARKER) {
                bail!("Excel rejected {:?}: {}", call, message.trim());
            }
            // anything else is host chatter
            tracing::trace!(output = reply, "PowerShell output");
        }
    }
}

impl SpreadsheetAutomation for PowerShellExcel {
    fn launch(&mut self) -> Result<()> {
        if self.host.is_none() {
            self.host = Some(self.spawn_host()?);
        }
        self.run(AutomationCall::Launch)
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.run(AutomationCall::SetVisible(visible))
    }

    fn open_workbook(&mut self, full_path: &str) -> Result<()> {
        self.run(AutomationCall::OpenWorkbook(full_path.to_string()))
    }

    fn select_sheets(&mut self, sheet_names: &[String]) -> Result<()> {
        self.run(AutomationCall::SelectSheets(sheet_names.to_vec()))
    }

    fn print_selection(&mut self) -> Result<()> {
        self.run(AutomationCall::PrintSelection)
    }

    fn close_workbook(&mut self, save_changes: bool) -> Result<()> {
        self.run(AutomationCall::CloseWorkbook { save_changes })
    }

    /// Quit Excel, end the host script and reap the process.
    fn quit(&mut self) -> Result<()> {
        let quit_result = self.run(AutomationCall::Quit);

        let Some(mut host) = self.host.take() else {
            return quit_result;
        };
        // the host may already be gone if it crashed
        let _ = writeln!(host.stdin, "exit 0");
        drop(host.stdin);

        let status = host
            .child
            .wait()
            .context("Failed to wait for PowerShell host")?;
        quit_result?;

        if !status.success() {
            bail!("PowerShell host exited with {}", status);
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "excel-com"
    }
}

impl Drop for PowerShellExcel {
    fn drop(&mut self) {
        if let Some(mut host) = self.host.take() {
            tracing::warn!("PowerShell host still running, killing it");
            let _ = host.child.kill();
            let _ = host.child.wait();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
