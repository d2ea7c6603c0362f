use crate::types::{ProbeKind, ProbeResult, ScanProfile};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("No scan results to tabulate")]
    EmptyResultSet,
    #[error("Got {results} results for {domains} domains")]
    LengthMismatch { domains: usize, results: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Flattens per-domain results into a rectangular table.
///
/// Single-cell kinds come first in profile order, followed by one numbered
/// column per value of each repeated kind, sized to the longest list seen.
pub fn assemble(
    domains: &[String],
    results: &[ProbeResult],
    profile: ScanProfile,
) -> Result<ResultTable, TableError> {
    if results.is_empty() {
        return Err(TableError::EmptyResultSet);
    }
    if domains.len() != results.len() {
        return Err(TableError::LengthMismatch {
            domains: domains.len(),
            results: results.len(),
        });
    }

    let (repeated, fixed): (Vec<ProbeKind>, Vec<ProbeKind>) =
        profile.probes().iter().copied().partition(|kind| kind.is_repeated());

    let widths: Vec<(ProbeKind, usize)> = repeated
        .iter()
        .map(|&kind| {
            let max_repeat = results.iter().map(|r| r.get(kind).len()).max().unwrap_or(0);
            (kind, max_repeat)
        })
        .collect();

    let mut header = vec!["Domain".to_string()];
    header.extend(fixed.iter().map(|kind| kind.column_name().to_string()));
    for &(kind, width) in &widths {
        header.extend((1..=width).map(|i| format!("{} {}", kind.column_name(), i)));
    }

    let rows = domains
        .iter()
        .zip(results)
        .map(|(domain, result)| {
            let mut row = Vec::with_capacity(header.len());
            row.push(domain.clone());
            row.extend(fixed.iter().map(|&kind| fixed_cell(kind, result.get(kind))));
            for &(kind, width) in &widths {
                let values = result.get(kind);
                row.extend(values.iter().cloned());
                row.resize(row.len() + width - values.len(), String::new());
            }
            row
        })
        .collect();

    Ok(ResultTable { header, rows })
}

fn fixed_cell(kind: ProbeKind, values: &[String]) -> String {
    match kind {
        ProbeKind::WhoisStatus => values.first().cloned().unwrap_or_default(),
        _ => values.join(", "),
    }
}
