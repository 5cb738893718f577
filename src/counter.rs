// 🔢 Invoice Counter - latest invoice number kept in a one-line text file

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::files::write_atomic;

pub struct InvoiceCounter {
    path: PathBuf,
}

impl InvoiceCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        InvoiceCounter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest invoice number.
    pub fn current(&self) -> Result<u64> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read invoice counter: {:?}", self.path))?;

        content
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invoice counter is not a number: {:?}", content.trim()))
    }

    /// Bump the counter by one and return the new value.
    pub fn increment(&self) -> Result<u64> {
        let next = self.current()? + 1;

        write_atomic(&self.path, next.to_string().as_bytes())
            .with_context(|| format!("Failed to write invoice counter: {:?}", self.path))?;

        tracing::info!(invoice = next, "Invoice counter advanced");
        Ok(next)
    }
}
