// 🏷️ GST Code Generator - address book + private marks → numbered CSV
//
// Output, one line per party, sorted by name, no header:
//   <n>,<tin>,<private mark or -->,<name>
//
// A private mark's target is looked up as a party name first. If no party
// has that name, every party whose TIN equals the target receives the mark.
// A target matching neither fails the whole run before anything is written.

use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::files::write_atomic;
use crate::parties::{load_addresses, load_private_marks, Addresses, PrivateMarks};

/// Written in place of a missing private mark.
pub const PLACEHOLDER: &str = "--";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("private mark '{mark}' points at '{target}', which is neither a party name nor a known TIN")]
    UnknownParty { mark: String, target: String },
}

// ============================================================================
// ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GstCodeRow {
    /// 1-based position in name order
    pub index: usize,
    pub tin: String,
    pub private_mark: Option<String>,
    pub name: String,
}

impl GstCodeRow {
    /// The four CSV fields in output order.
    pub fn fields(&self) -> [String; 4] {
        [
            self.index.to_string(),
            self.tin.clone(),
            self.private_mark
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            self.name.clone(),
        ]
    }
}

// ============================================================================
// MERGE
// ============================================================================

/// Attach private marks to parties and number them in name order.
///
/// Marks are applied in file order; the first mark a party receives is kept.
pub fn merge(addresses: &Addresses, marks: &PrivateMarks) -> Result<Vec<GstCodeRow>, MergeError> {
    let mut assigned: BTreeMap<&str, &str> = BTreeMap::new();

    for (mark, target) in marks.iter() {
        let names = resolve_target(addresses, target);
        if names.is_empty() {
            return Err(MergeError::UnknownParty {
                mark: mark.to_string(),
                target: target.to_string(),
            });
        }
        for name in names {
            assigned.entry(name).or_insert(mark);
        }
    }

    // BTreeMap iteration is already lexicographic by name
    let rows = addresses
        .iter()
        .enumerate()
        .map(|(i, (name, record))| GstCodeRow {
            index: i + 1,
            tin: record.tin.clone(),
            private_mark: assigned.get(name.as_str()).map(|m| m.to_string()),
            name: name.clone(),
        })
        .collect();

    Ok(rows)
}

fn resolve_target<'a>(addresses: &'a Addresses, target: &str) -> Vec<&'a str> {
    if let Some((name, _)) = addresses.get_key_value(target) {
        return vec![name.as_str()];
    }

    addresses
        .iter()
        .filter(|(_, record)| record.tin == target)
        .map(|(name, _)| name.as_str())
        .collect()
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Render rows as headerless, `\n`-terminated CSV.
pub fn render_csv(rows: &[GstCodeRow]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        wtr.write_record(row.fields())
            .with_context(|| format!("Failed to encode row {} ({})", row.index, row.name))?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV buffer: {}", e.error()))
}

/// Write the report through a sibling temp file so a failed run never leaves
/// a truncated report behind.
pub fn write_report(path: &Path, rows: &[GstCodeRow]) -> Result<()> {
    let bytes = render_csv(rows)?;
    write_atomic(path, &bytes).context("Failed to write GST code report")
}

/// Load both mappings, merge, and write the report. Returns the row count.
pub fn generate(addresses_path: &Path, marks_path: &Path, output_path: &Path) -> Result<usize> {
    let addresses = load_addresses(addresses_path)?;
    let marks = load_private_marks(marks_path)?;
    tracing::debug!(
        parties = addresses.len(),
        marks = marks.len(),
        "Loaded party database"
    );

    let rows = merge(&addresses, &marks)?;
    let with_marks = rows.iter().filter(|r| r.private_mark.is_some()).count();

    write_report(output_path, &rows)?;
    tracing::info!(
        rows = rows.len(),
        with_marks,
        output = %output_path.display(),
        "GST code report written"
    );

    Ok(rows.len())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parties::PartyRecord;

    fn addresses(entries: &[(&str, &str, &str)]) -> Addresses {
        entries
            .iter()
            .map(|(name, address, tin)| (name.to_string(), PartyRecord::new(*address, *tin)))
            .collect()
    }

    fn marks(entries: &[(&str, &str)]) -> PrivateMarks {
        entries.iter().copied().collect()
    }

    fn render(rows: &[GstCodeRow]) -> String {
        String::from_utf8(render_csv(rows).unwrap()).unwrap()
    }

    #[test]
    fn test_mark_matched_by_tin() {
        let rows = merge(&addresses(&[("Acme", "123 St", "T1")]), &marks(&[("X", "T1")])).unwrap();
        assert_eq!(render(&rows), "1,T1,X,Acme\n");
    }

    #[test]
    fn test_no_marks_uses_placeholder() {
        let rows = merge(&addresses(&[("Beta", "456 Ave", "T2")]), &PrivateMarks::new()).unwrap();
        assert_eq!(render(&rows), "1,T2,--,Beta\n");
    }

    #[test]
    fn test_mark_matched_by_party_name() {
        let rows = merge(
            &addresses(&[("Acme", "123 St", "T1"), ("Beta", "456 Ave", "T2")]),
            &marks(&[("BB", "Beta")]),
        )
        .unwrap();

        assert_eq!(render(&rows), "1,T1,--,Acme\n2,T2,BB,Beta\n");
    }

    #[test]
    fn test_rows_sorted_by_name_and_numbered() {
        let rows = merge(
            &addresses(&[
                ("Zeta Traders", "z", "T26"),
                ("Alpha Pipes", "a", "T01"),
                ("Mu Hardware", "m", "T13"),
            ]),
            &PrivateMarks::new(),
        )
        .unwrap();

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        let indexes: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(names, vec!["Alpha Pipes", "Mu Hardware", "Zeta Traders"]);
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_is_byte_order() {
        let rows = merge(
            &addresses(&[("acme", "a", "T1"), ("Zeta", "z", "T2")]),
            &PrivateMarks::new(),
        )
        .unwrap();

        // uppercase sorts before lowercase
        assert_eq!(rows[0].name, "Zeta");
        assert_eq!(rows[1].name, "acme");
    }

    #[test]
    fn test_first_mark_wins() {
        let rows = merge(
            &addresses(&[("Acme", "123 St", "T1")]),
            &marks(&[("FIRST", "Acme"), ("SECOND", "T1")]),
        )
        .unwrap();

        assert_eq!(rows[0].private_mark.as_deref(), Some("FIRST"));
    }

    #[test]
    fn test_shared_tin_marks_every_party() {
        let rows = merge(
            &addresses(&[("Acme East", "e", "T1"), ("Acme West", "w", "T1"), ("Beta", "b", "T2")]),
            &marks(&[("AC", "T1")]),
        )
        .unwrap();

        assert_eq!(rows[0].private_mark.as_deref(), Some("AC"));
        assert_eq!(rows[1].private_mark.as_deref(), Some("AC"));
        assert_eq!(rows[2].private_mark, None);
    }

    #[test]
    fn test_unknown_target_fails() {
        let err = merge(&addresses(&[("Acme", "123 St", "T1")]), &marks(&[("X", "Ghost")]))
            .unwrap_err();

        assert_eq!(
            err,
            MergeError::UnknownParty {
                mark: "X".to_string(),
                target: "Ghost".to_string()
            }
        );
    }

    #[test]
    fn test_row_count_matches_address_book() {
        let book = addresses(&[("A", "a", "T1"), ("B", "b", "T2"), ("C", "c", "T3")]);
        let rows = merge(&book, &marks(&[("m", "B")])).unwrap();
        assert_eq!(rows.len(), book.len());
    }

    #[test]
    fn test_field_with_comma_is_quoted() {
        let rows = merge(&addresses(&[("Acme, Inc", "x", "T1")]), &PrivateMarks::new()).unwrap();
        assert_eq!(render(&rows), "1,T1,--,\"Acme, Inc\"\n");
    }

    #[test]
    fn test_field_with_quote_is_escaped() {
        let rows = merge(&addresses(&[(r#"Acme "Best""#, "x", "T1")]), &PrivateMarks::new()).unwrap();
        assert_eq!(render(&rows), "1,T1,--,\"Acme \"\"Best\"\"\"\n");
    }

    #[test]
    fn test_plain_fields_are_written_raw() {
        let rows = merge(
            &addresses(&[("Sri Ganesh & Co.", "x", "29AAA")]),
            &marks(&[("S/G-1", "Sri Ganesh & Co.")]),
        )
        .unwrap();
        assert_eq!(render(&rows), "1,29AAA,S/G-1,Sri Ganesh & Co.\n");
    }

    #[test]
    fn test_empty_address_book_renders_nothing() {
        let rows = merge(&Addresses::new(), &PrivateMarks::new()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(render(&rows), "");
    }
}
