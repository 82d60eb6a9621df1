//! Sector workbook: one sheet of band-crossing signals per sector.
//!
//! A workbook is either a spreadsheet file (`.xlsx`, `.xls`, `.ods`, ...)
//! whose worksheet names are the sector labels, or a directory of `.csv`
//! files whose file stems are the sector labels. A single `.csv` file is
//! read as a one-sector workbook. The workbook is read once and never
//! modified.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader};
use thiserror::Error;

use crate::signals::{Band, TickerRow};

pub const SYMBOL_COLUMN: &str = "Symbol";
pub const DAILY_BAND_COLUMN: &str = "Crossing Daily Band";
pub const WEEKLY_BAND_COLUMN: &str = "Crossing Weekly Band";
pub const MONTHLY_BAND_COLUMN: &str = "Crossing Monthly Band";

/// The band columns in display order.
pub const BAND_COLUMNS: [&str; 3] = [DAILY_BAND_COLUMN, WEEKLY_BAND_COLUMN, MONTHLY_BAND_COLUMN];

/// Errors from loading or querying a workbook.
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Malformed CSV in sheet '{sheet}': {source}")]
    Csv { sheet: String, source: csv::Error },
    #[error("Failed to read spreadsheet {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        source: calamine::Error,
    },
    #[error("Sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },
    #[error("No sector sheets found in {0}")]
    Empty(PathBuf),
    #[error("Unknown sector: {0}")]
    UnknownSector(String),
}

/// All sector sheets, keyed by sector name.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: BTreeMap<String, Vec<TickerRow>>,
}

impl Workbook {
    /// Loads a spreadsheet file, a single CSV sheet, or a directory of CSV
    /// sheets, depending on what `path` points at.
    pub fn load(path: &Path) -> Result<Self, WorkbookError> {
        let metadata = std::fs::metadata(path).map_err(|source| WorkbookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let workbook = if metadata.is_dir() {
            Self::load_csv_dir(path)?
        } else if is_csv(path) {
            let mut workbook = Workbook::default();
            load_csv_file(&mut workbook, path)?;
            workbook
        } else {
            Self::load_spreadsheet(path)?
        };

        if workbook.is_empty() {
            return Err(WorkbookError::Empty(path.to_path_buf()));
        }
        Ok(workbook)
    }

    /// Loads every worksheet of a spreadsheet file. Blank worksheets are skipped.
    pub fn load_spreadsheet(path: &Path) -> Result<Self, WorkbookError> {
        let spreadsheet_err = |source| WorkbookError::Spreadsheet {
            path: path.to_path_buf(),
            source,
        };

        let mut sheets = calamine::open_workbook_auto(path).map_err(spreadsheet_err)?;
        let mut workbook = Workbook::default();
        for name in sheets.sheet_names() {
            let range = sheets.worksheet_range(&name).map_err(spreadsheet_err)?;
            let mut records = range
                .rows()
                .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
            let Some(headers) = records.next() else {
                tracing::debug!("Skipping blank worksheet '{}'", name);
                continue;
            };
            let rows = build_rows(&name, &headers, records.map(Ok))?;
            tracing::debug!("Loaded sector '{}' with {} tickers", name, rows.len());
            workbook.insert(&name, rows);
        }
        Ok(workbook)
    }

    /// Loads every `*.csv` file in `dir` as a sector sheet.
    pub fn load_csv_dir(dir: &Path) -> Result<Self, WorkbookError> {
        let io_err = |source| WorkbookError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut workbook = Workbook::default();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && is_csv(&path) {
                load_csv_file(&mut workbook, &path)?;
            }
        }
        Ok(workbook)
    }

    /// Adds or replaces a sheet.
    pub fn insert(&mut self, sector: &str, rows: Vec<TickerRow>) {
        self.sheets.insert(sector.to_string(), rows);
    }

    /// Sector names in sorted order.
    pub fn sectors(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// Rows of one sector in sheet order. Exact names win; otherwise the
    /// lookup is case-insensitive.
    pub fn sector(&self, name: &str) -> Result<&[TickerRow], WorkbookError> {
        let name = name.trim();
        if let Some(rows) = self.sheets.get(name) {
            return Ok(rows);
        }
        self.sheets
            .iter()
            .find(|(sector, _)| sector.eq_ignore_ascii_case(name))
            .map(|(_, rows)| rows.as_slice())
            .ok_or_else(|| WorkbookError::UnknownSector(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn load_csv_file(workbook: &mut Workbook, path: &Path) -> Result<(), WorkbookError> {
    let Some(sector) = path.file_stem().and_then(|s| s.to_str()) else {
        tracing::warn!("Skipping sheet with non UTF-8 name: {}", path.display());
        return Ok(());
    };
    let file = std::fs::File::open(path).map_err(|source| WorkbookError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_sheet(sector, file)?;
    tracing::debug!("Loaded sector '{}' with {} tickers", sector, rows.len());
    workbook.insert(sector, rows);
    Ok(())
}

/// Spreadsheet cell as trimmed text. Empty cells become `""`.
fn cell_text(cell: &Data) -> String {
    cell.to_string().trim().to_string()
}

/// Parses one CSV sector sheet.
pub fn parse_sheet<R: io::Read>(sheet: &str, reader: R) -> Result<Vec<TickerRow>, WorkbookError> {
    let csv_err = |source| WorkbookError::Csv {
        sheet: sheet.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    let records = rdr.records().map(|record| {
        record
            .map(|r| r.iter().map(str::to_string).collect())
            .map_err(csv_err)
    });
    build_rows(sheet, &headers, records)
}

/// Turns a header row and its records into ticker rows.
///
/// Required columns are matched case-insensitively after trimming. Rows
/// with a blank symbol are skipped and short rows read as blank cells.
/// Every other column is kept in [`TickerRow::extra`].
fn build_rows<I>(sheet: &str, headers: &[String], records: I) -> Result<Vec<TickerRow>, WorkbookError>
where
    I: Iterator<Item = Result<Vec<String>, WorkbookError>>,
{
    let find = |column: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column))
            .ok_or_else(|| WorkbookError::MissingColumn {
                sheet: sheet.to_string(),
                column: column.to_string(),
            })
    };
    let symbol_idx = find(SYMBOL_COLUMN)?;
    let daily_idx = find(DAILY_BAND_COLUMN)?;
    let weekly_idx = find(WEEKLY_BAND_COLUMN)?;
    let monthly_idx = find(MONTHLY_BAND_COLUMN)?;
    let required = [symbol_idx, daily_idx, weekly_idx, monthly_idx];

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        let cell = |idx: usize| record.get(idx).map(|c| c.trim()).unwrap_or("");

        let symbol = cell(symbol_idx);
        if symbol.is_empty() {
            continue;
        }

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !required.contains(idx))
            .map(|(idx, header)| (header.trim().to_string(), cell(idx).to_string()))
            .collect();

        rows.push(TickerRow {
            symbol: symbol.to_string(),
            daily: Band::parse(cell(daily_idx)),
            weekly: Band::parse(cell(weekly_idx)),
            monthly: Band::parse(cell(monthly_idx)),
            extra,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TECH_SHEET: &str = "\
Symbol,Name,Crossing Daily Band,Crossing Weekly Band,Crossing Monthly Band,Close
XLK,Technology Select,UBand 1STD,Mid Zone,UBand 2STD,230.10
SMH,Semiconductor ETF,LBand 1STD,LBand 1STD,Mid Zone,245.00
";

    #[test]
    fn parse_sheet_reads_bands_and_extra_columns() {
        let rows = parse_sheet("Technology", TECH_SHEET.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let xlk = &rows[0];
        assert_eq!(xlk.symbol, "XLK");
        assert_eq!(xlk.daily, Band::UBand1Std);
        assert_eq!(xlk.weekly, Band::MidZone);
        assert_eq!(xlk.monthly, Band::UBand2Std);
        assert_eq!(
            xlk.extra,
            vec![
                ("Name".to_string(), "Technology Select".to_string()),
                ("Close".to_string(), "230.10".to_string()),
            ]
        );
        assert_eq!(rows[1].daily, Band::LBand1Std);
    }

    #[test]
    fn parse_sheet_header_matching_is_lenient() {
        let sheet = " symbol , crossing daily band,CROSSING WEEKLY BAND,Crossing Monthly Band\nXLE,Mid Zone,Mid Zone,LBand 2STD\n";
        let rows = parse_sheet("Energy", sheet.as_bytes()).unwrap();
        assert_eq!(rows[0].symbol, "XLE");
        assert_eq!(rows[0].monthly, Band::LBand2Std);
        assert!(rows[0].extra.is_empty());
    }

    #[test]
    fn parse_sheet_missing_column() {
        let sheet = "Symbol,Crossing Daily Band,Crossing Weekly Band\nXLE,Mid Zone,Mid Zone\n";
        let err = parse_sheet("Energy", sheet.as_bytes()).unwrap_err();
        match err {
            WorkbookError::MissingColumn { sheet, column } => {
                assert_eq!(sheet, "Energy");
                assert_eq!(column, MONTHLY_BAND_COLUMN);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_sheet_skips_blank_symbols_and_keeps_short_rows() {
        let sheet = "Symbol,Crossing Daily Band,Crossing Weekly Band,Crossing Monthly Band\n,Mid Zone,Mid Zone,Mid Zone\nXLU,UBand 2STD\n";
        let rows = parse_sheet("Utilities", sheet.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "XLU");
        assert_eq!(rows[0].daily, Band::UBand2Std);
        assert_eq!(rows[0].weekly, Band::Unrecognized(String::new()));
    }

    #[test]
    fn parse_sheet_unknown_band_text_is_kept() {
        let sheet = "Symbol,Crossing Daily Band,Crossing Weekly Band,Crossing Monthly Band\nXLB,Upper,Mid Zone,Mid Zone\n";
        let rows = parse_sheet("Materials", sheet.as_bytes()).unwrap();
        assert_eq!(rows[0].daily, Band::Unrecognized("Upper".to_string()));
    }

    #[test]
    fn load_directory_of_sheets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Technology.csv"), TECH_SHEET).unwrap();
        std::fs::write(
            dir.path().join("Energy.CSV"),
            "Symbol,Crossing Daily Band,Crossing Weekly Band,Crossing Monthly Band\nXLE,Mid Zone,Mid Zone,Mid Zone\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let workbook = Workbook::load(dir.path()).unwrap();
        assert_eq!(workbook.len(), 2);
        assert_eq!(workbook.sectors().collect::<Vec<_>>(), vec!["Energy", "Technology"]);
        assert_eq!(workbook.sector("Technology").unwrap().len(), 2);
        assert_eq!(workbook.sector("energy").unwrap()[0].symbol, "XLE");
    }

    #[test]
    fn load_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Workbook::load(dir.path()).unwrap_err();
        assert!(matches!(err, WorkbookError::Empty(_)));
    }

    #[test]
    fn load_missing_directory_fails() {
        let err = Workbook::load(Path::new("/nonexistent/bbands-sheets")).unwrap_err();
        assert!(matches!(err, WorkbookError::Io { .. }));
    }

    fn write_xlsx(path: &Path) {
        let mut book = rust_xlsxwriter::Workbook::new();

        let tech = book.add_worksheet();
        tech.set_name("Technology").unwrap();
        let headers = [
            "Symbol",
            "Name",
            "Crossing Daily Band",
            "Crossing Weekly Band",
            "Crossing Monthly Band",
            "Close",
        ];
        for (col, header) in headers.iter().enumerate() {
            tech.write_string(0, col as u16, *header).unwrap();
        }
        tech.write_string(1, 0, "XLK").unwrap();
        tech.write_string(1, 1, "Technology Select").unwrap();
        tech.write_string(1, 2, "UBand 1STD").unwrap();
        tech.write_string(1, 3, "Mid Zone").unwrap();
        tech.write_string(1, 4, "UBand 2STD").unwrap();
        tech.write_number(1, 5, 230.5).unwrap();
        tech.write_string(2, 0, "SMH").unwrap();
        tech.write_string(2, 2, "LBand 1STD").unwrap();
        tech.write_string(2, 3, "LBand 1STD").unwrap();
        tech.write_string(2, 4, "Mid Zone").unwrap();

        let energy = book.add_worksheet();
        energy.set_name("Energy").unwrap();
        for (col, header) in ["symbol", "crossing daily band", "Crossing Weekly Band", "CROSSING MONTHLY BAND"]
            .iter()
            .enumerate()
        {
            energy.write_string(0, col as u16, *header).unwrap();
        }
        for (col, value) in ["XLE", "Mid Zone", "Mid Zone", "LBand 2STD"].iter().enumerate() {
            energy.write_string(1, col as u16, *value).unwrap();
        }

        book.add_worksheet().set_name("Notes").unwrap();

        book.save(path).unwrap();
    }

    #[test]
    fn load_xlsx_sheets_as_sectors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sectors.xlsx");
        write_xlsx(&path);

        let workbook = Workbook::load(&path).unwrap();
        // The blank "Notes" worksheet is skipped.
        assert_eq!(workbook.sectors().collect::<Vec<_>>(), vec!["Energy", "Technology"]);

        let tech = workbook.sector("Technology").unwrap();
        assert_eq!(tech.len(), 2);
        assert_eq!(tech[0].symbol, "XLK");
        assert_eq!(tech[0].daily, Band::UBand1Std);
        assert_eq!(tech[0].monthly, Band::UBand2Std);
        assert_eq!(
            tech[0].extra,
            vec![
                ("Name".to_string(), "Technology Select".to_string()),
                ("Close".to_string(), "230.5".to_string()),
            ]
        );
        assert_eq!(tech[1].symbol, "SMH");
        assert_eq!(tech[1].extra[0], ("Name".to_string(), String::new()));

        let energy = workbook.sector("energy").unwrap();
        assert_eq!(energy[0].symbol, "XLE");
        assert_eq!(energy[0].monthly, Band::LBand2Std);
        assert!(energy[0].extra.is_empty());
    }

    #[test]
    fn load_xlsx_missing_column_names_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        let mut book = rust_xlsxwriter::Workbook::new();
        let sheet = book.add_worksheet();
        sheet.set_name("Utilities").unwrap();
        sheet.write_string(0, 0, "Symbol").unwrap();
        sheet.write_string(0, 1, "Crossing Daily Band").unwrap();
        sheet.write_string(1, 0, "XLU").unwrap();
        book.save(&path).unwrap();

        let err = Workbook::load(&path).unwrap_err();
        match err {
            WorkbookError::MissingColumn { sheet, column } => {
                assert_eq!(sheet, "Utilities");
                assert_eq!(column, WEEKLY_BAND_COLUMN);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_single_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Technology.csv");
        std::fs::write(&path, TECH_SHEET).unwrap();

        let workbook = Workbook::load(&path).unwrap();
        assert_eq!(workbook.sectors().collect::<Vec<_>>(), vec!["Technology"]);
        assert_eq!(workbook.sector("Technology").unwrap()[1].symbol, "SMH");
    }

    #[test]
    fn load_unreadable_spreadsheet_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sectors.xlsx");
        std::fs::write(&path, "not a zip archive").unwrap();

        let err = Workbook::load(&path).unwrap_err();
        assert!(matches!(err, WorkbookError::Spreadsheet { .. }));
        assert!(err.to_string().contains("sectors.xlsx"));
    }

    #[test]
    fn unknown_sector() {
        let mut workbook = Workbook::default();
        workbook.insert("Energy", Vec::new());
        let err = workbook.sector("Crypto").unwrap_err();
        assert!(matches!(err, WorkbookError::UnknownSector(ref s) if s == "Crypto"));
        assert!(err.to_string().contains("Crypto"));
    }

    #[test]
    fn exact_sector_name_wins_over_case_insensitive() {
        let mut workbook = Workbook::default();
        workbook.insert("ENERGY", vec![TickerRow::new("A", Band::MidZone, Band::MidZone, Band::MidZone)]);
        workbook.insert("Energy", vec![TickerRow::new("B", Band::MidZone, Band::MidZone, Band::MidZone)]);
        assert_eq!(workbook.sector("Energy").unwrap()[0].symbol, "B");
        assert_eq!(workbook.sector("ENERGY").unwrap()[0].symbol, "A");
    }
}
