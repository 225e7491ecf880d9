//! XLSX Output Writer
//!
//! Serializes an ordered record batch into spreadsheet bytes: one worksheet,
//! a fixed bold 5-column header, one row per record. Identifier and passport
//! number cells are written as text so leading zeros survive Excel. The
//! workbook never touches disk; the buffer goes straight into the HTTP
//! response.

use rust_xlsxwriter::{Format, Workbook};

use crate::collector::Record;
use crate::error::AppResult;

/// Worksheet name
pub const SHEET_NAME: &str = "generated";

/// Header captions and column widths, in output order
pub const COLUMNS: [(&str, f64); 5] = [
    ("No", 6.0),
    ("PINFL", 20.0),
    ("Passport Prefix", 12.0),
    ("Passport Number", 12.0),
    ("Passport Full", 20.0),
];

/// Build the workbook and return the XLSX byte buffer
pub fn build_workbook(records: &[Record]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, (caption, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)?;
        worksheet.write_string_with_format(0, col, *caption, &bold)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1; // row 0 is the header
        worksheet.write_number(row, 0, record.sequence)?;
        worksheet.write_string(row, 1, &record.identifier)?;
        worksheet.write_string(row, 2, record.passport.prefix)?;
        worksheet.write_string(row, 3, &record.passport.number)?;
        worksheet.write_string(row, 4, &record.passport.full)?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::collect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_workbook_bytes_are_zip() {
        let mut rng = StdRng::seed_from_u64(11);
        let records = collect(10, &mut rng).unwrap();
        let bytes = build_workbook(&records).unwrap();
        // XLSX is a ZIP container; check the local file header magic
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_batch_still_produces_header_only_workbook() {
        let bytes = build_workbook(&[]).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_column_captions_fixed_order() {
        let captions: Vec<&str> = COLUMNS.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            captions,
            vec!["No", "PINFL", "Passport Prefix", "Passport Number", "Passport Full"]
        );
    }
}
