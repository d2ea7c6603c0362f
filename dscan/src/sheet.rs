use calamine::{open_workbook_auto, Data, Reader};
use libdns_sweep::ResultTable;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SHEET_NAME: &str = "DNS Scan Results";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("No domains found in {}", .0.display())]
    EmptyInput(PathBuf),
    #[error("Failed to read {}: {error}", .path.display())]
    Read { path: PathBuf, error: BoxError },
    #[error("Failed to write {}: {error}", .path.display())]
    Write { path: PathBuf, error: BoxError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Workbook,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Format::Csv,
            _ => Format::Workbook,
        }
    }
}

/// Reads the first column of `path`, dropping blank cells and the header.
pub fn read_domains(path: &Path) -> Result<Vec<String>, SheetError> {
    let cells = match Format::from_path(path) {
        Format::Csv => read_csv_column(path),
        Format::Workbook => read_workbook_column(path),
    }
    .map_err(|error| SheetError::Read {
        path: path.to_path_buf(),
        error,
    })?;

    let domains: Vec<String> = cells
        .into_iter()
        .filter(|cell| !cell.trim().is_empty())
        .skip(1)
        .collect();

    if domains.is_empty() {
        return Err(SheetError::EmptyInput(path.to_path_buf()));
    }
    Ok(domains)
}

fn read_csv_column(path: &Path) -> Result<Vec<String>, BoxError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record?;
        cells.push(record.get(0).unwrap_or_default().to_string());
    }
    Ok(cells)
}

fn read_workbook_column(path: &Path) -> Result<Vec<String>, BoxError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or("workbook has no worksheets")??;

    // The range starts at the first used cell; column A may be entirely blank.
    if range.start().map_or(true, |(_, col)| col != 0) {
        return Ok(Vec::new());
    }

    Ok(range
        .rows()
        .map(|row| match row.first() {
            None | Some(Data::Empty) => String::new(),
            Some(cell) => cell.to_string(),
        })
        .collect())
}

pub fn write_table(path: &Path, table: &ResultTable) -> Result<(), SheetError> {
    match Format::from_path(path) {
        Format::Csv => write_csv(path, table),
        Format::Workbook => write_workbook(path, table),
    }
    .map_err(|error| SheetError::Write {
        path: path.to_path_buf(),
        error,
    })
}

fn write_csv(path: &Path, table: &ResultTable) -> Result<(), BoxError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_workbook(path: &Path, table: &ResultTable) -> Result<(), BoxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (row, cells) in std::iter::once(&table.header).chain(&table.rows).enumerate() {
        let row = u32::try_from(row)?;
        for (col, value) in cells.iter().enumerate() {
            worksheet.write_string(row, u16::try_from(col)?, value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn table() -> ResultTable {
        ResultTable {
            header: vec!["Domain".into(), "A Record".into(), "NS Record 1".into()],
            rows: vec![
                vec!["a.example".into(), "1.2.3.4".into(), "ns1.example".into()],
                vec!["b.example".into(), "".into(), "".into()],
            ],
        }
    }

    #[test]
    fn csv_input_skips_header_and_blank_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("domains.csv");
        fs::write(&path, "domain,note\na.example,x\n,\nb.example\n").unwrap();

        assert_eq!(read_domains(&path).unwrap(), ["a.example", "b.example"]);
    }

    #[test]
    fn header_only_input_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("domains.csv");
        fs::write(&path, "domain\n").unwrap();

        assert!(matches!(read_domains(&path), Err(SheetError::EmptyInput(_))));
    }

    #[test]
    fn missing_input_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let result = read_domains(&dir.path().join("absent.xlsx"));
        assert!(matches!(result, Err(SheetError::Read { .. })));
    }

    #[test]
    fn csv_output_has_header_and_padded_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&path, &table()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written.lines().collect::<Vec<_>>(),
            ["Domain,A Record,NS Record 1", "a.example,1.2.3.4,ns1.example", "b.example,,"]
        );
    }

    #[test]
    fn workbook_output_reads_back_as_domain_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");
        write_table(&path, &table()).unwrap();

        let workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), [SHEET_NAME]);
        assert_eq!(read_domains(&path).unwrap(), ["a.example", "b.example"]);
    }

    #[test]
    fn unwritable_output_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");
        assert!(matches!(
            write_table(&path, &table()),
            Err(SheetError::Write { .. })
        ));
    }
}
