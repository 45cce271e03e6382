//! Spreadsheet-friendly CSV rendering.
//!
//! Output opens directly in Excel: UTF-8 BOM so accented text survives and
//! `;` as the column separator.

use thiserror::Error;

pub const CSV_SEPARATOR: char = ';';

/// Types that can be rendered as CSV rows
pub trait CsvExportable {
    fn headers() -> Vec<&'static str>;

    fn to_csv_row(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("No hay datos para exportar")]
    Empty,
}

/// Render `rows` with a header line; refuses an empty list
pub fn build_csv<T: CsvExportable>(rows: &[T]) -> Result<String, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let separator = CSV_SEPARATOR.to_string();
    let mut content = String::from('\u{FEFF}');
    content.push_str(&T::headers().join(&separator));
    content.push('\n');

    for row in rows {
        let cells: Vec<String> = row.to_csv_row().iter().map(|c| escape_cell(c)).collect();
        content.push_str(&cells.join(&separator));
        content.push('\n');
    }
    Ok(content)
}

/// Quote a cell holding the separator, quotes or line breaks
pub fn escape_cell(cell: &str) -> String {
    if cell.contains(|c| matches!(c, ';' | '"' | '\n' | '\r')) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(&'static str, &'static str);

    impl CsvExportable for Pair {
        fn headers() -> Vec<&'static str> {
            vec!["A", "B"]
        }

        fn to_csv_row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("simple"), "simple");
        assert_eq!(escape_cell("a;b"), "\"a;b\"");
        assert_eq!(escape_cell("dice \"hola\""), "\"dice \"\"hola\"\"\"");
        assert_eq!(escape_cell("dos\nlíneas"), "\"dos\nlíneas\"");
    }

    #[test]
    fn test_build_csv() {
        let csv = build_csv(&[Pair("1", "x;y"), Pair("2", "z")]).unwrap();
        assert_eq!(csv, "\u{FEFF}A;B\n1;\"x;y\"\n2;z\n");
    }

    #[test]
    fn test_empty_export_is_refused() {
        assert_eq!(build_csv::<Pair>(&[]), Err(ExportError::Empty));
    }
}
