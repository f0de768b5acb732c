use review_export_models::{ExportRow, Platform};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::info;

/// Header and column width of every worksheet, in column order
pub const COLUMNS: [(&str, f64); 10] = [
    ("Version", 10.0),
    ("Author", 15.0),
    ("Date", 12.0),
    ("Rating", 8.0),
    ("Title", 25.0),
    ("Review", 50.0),
    ("Translated Review", 50.0),
    ("Country", 12.0),
    ("Developer Reply", 50.0),
    ("Reply Date", 12.0),
];

const RATING_COLUMN: u16 = 3;

/// One platform's rows, written as a worksheet named after the platform
#[derive(Debug, Clone)]
pub struct ReviewSheet {
    pub platform: Platform,
    pub rows: Vec<ExportRow>,
}

impl ReviewSheet {
    pub fn new(platform: Platform, rows: Vec<ExportRow>) -> Self {
        Self { platform, rows }
    }
}

fn row_cells(row: &ExportRow) -> [&str; 10] {
    let r = &row.record;
    [
        &r.version,
        &r.author,
        &r.date,
        "", // rating is numeric
        &r.title,
        &r.review,
        &row.translated_review,
        &r.country,
        &r.developer_reply,
        &r.reply_date,
    ]
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &ReviewSheet) -> Result<(), XlsxError> {
    worksheet.set_name(sheet.platform.sheet_name())?;

    let header = Format::new().set_bold();
    for (col, (title, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)?;
        worksheet.write_string_with_format(0, col, *title, &header)?;
    }

    for (index, row) in sheet.rows.iter().enumerate() {
        let line = (index + 1) as u32;
        for (col, value) in row_cells(row).iter().enumerate() {
            let col = col as u16;
            if col == RATING_COLUMN {
                worksheet.write_number(line, col, row.record.rating)?;
            } else {
                worksheet.write_string(line, col, *value)?;
            }
        }
    }

    Ok(())
}

/// Build the workbook in memory, one worksheet per sheet in the given order
pub fn build_workbook(sheets: &[ReviewSheet]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet)?;
    }
    Ok(workbook)
}

/// Write all sheets to a single `.xlsx` file, replacing any existing file
pub fn write_workbook(path: &Path, sheets: &[ReviewSheet]) -> Result<(), XlsxError> {
    let mut workbook = build_workbook(sheets)?;
    workbook.save(path)?;
    info!("Workbook written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_export_models::ReviewRecord;
    use tempfile::TempDir;

    fn row(author: &str, rating: u8) -> ExportRow {
        ExportRow::untranslated(ReviewRecord {
            author: author.to_string(),
            rating,
            review: "Works great".to_string(),
            ..ReviewRecord::default()
        })
    }

    #[test]
    fn test_columns_in_order() {
        let titles: Vec<&str> = COLUMNS.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            titles,
            vec![
                "Version",
                "Author",
                "Date",
                "Rating",
                "Title",
                "Review",
                "Translated Review",
                "Country",
                "Developer Reply",
                "Reply Date"
            ]
        );
        assert_eq!(COLUMNS[RATING_COLUMN as usize].0, "Rating");
    }

    #[test]
    fn test_row_cells_follow_columns() {
        let export = ExportRow::new(
            ReviewRecord {
                version: "2.3".to_string(),
                author: "A".to_string(),
                date: "2024-03-15".to_string(),
                rating: 4,
                title: "T".to_string(),
                review: "R".to_string(),
                country: "France".to_string(),
                developer_reply: "Merci".to_string(),
                reply_date: "2024-03-16".to_string(),
            },
            "R (en)".to_string(),
        );

        assert_eq!(
            row_cells(&export),
            ["2.3", "A", "2024-03-15", "", "T", "R", "R (en)", "France", "Merci", "2024-03-16"]
        );
    }

    #[test]
    fn test_sheets_named_by_platform() {
        let sheets = vec![
            ReviewSheet::new(Platform::Ios, vec![row("alice", 5)]),
            ReviewSheet::new(Platform::Android, vec![row("bob", 1), row("carol", 3)]),
        ];

        let mut workbook = build_workbook(&sheets).unwrap();
        assert!(workbook.worksheet_from_name("iOS").is_ok());
        assert!(workbook.worksheet_from_name("Android").is_ok());
    }

    #[test]
    fn test_write_workbook_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app_reviews.xlsx");

        write_workbook(&path, &[ReviewSheet::new(Platform::Ios, vec![row("alice", 5)])]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 100);
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_sheet_still_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.xlsx");

        write_workbook(&path, &[ReviewSheet::new(Platform::Android, Vec::new())]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");

        assert!(write_workbook(&path, &[ReviewSheet::new(Platform::Ios, Vec::new())]).is_err());
    }
}
