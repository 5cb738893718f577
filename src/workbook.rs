// 📗 Workbook Inspection - sheet names straight from the .xlsx package
//
// An .xlsx file is a zip archive; the sheet list lives in xl/workbook.xml as
// <sheet name="..." sheetId="..." r:id="..."/> elements, in tab order.
// Reading it locally proves the file exists and is a real workbook before any
// spreadsheet application gets involved.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

const WORKBOOK_PART: &str = "xl/workbook.xml";

static SHEET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<(?:\w+:)?sheet\b[^>]*?\bname\s*=\s*"([^"]*)""#).unwrap());

/// Sheet names of the workbook at `path`, in tab order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open workbook: {:?}", path))?;

    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("Not a spreadsheet package: {:?}", path))?;

    let mut xml = String::new();
    archive
        .by_name(WORKBOOK_PART)
        .with_context(|| format!("{} missing from {:?}", WORKBOOK_PART, path))?
        .read_to_string(&mut xml)
        .with_context(|| format!("Failed to read {} from {:?}", WORKBOOK_PART, path))?;

    let names = parse_sheet_names(&xml);
    if names.is_empty() {
        bail!("Workbook has no sheets: {:?}", path);
    }
    Ok(names)
}

/// Pull sheet names out of a workbook.xml body.
pub fn parse_sheet_names(xml: &str) -> Vec<String> {
    SHEET_TAG
        .captures_iter(xml)
        .map(|caps| unescape_xml(&caps[1]))
        .collect()
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
