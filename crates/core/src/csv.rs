//! Minimal CSV writer for the export endpoints.
//!
//! Output is headered, comma-delimited UTF-8 with `\n` line endings. Fields
//! containing a comma, quote, CR or LF are quoted with inner quotes doubled.

/// A record type that can be written as one CSV row.
pub trait CsvRecord {
    /// Header names, in output order.
    const COLUMNS: &'static [&'static str];

    /// Cell values in the same order as [`CsvRecord::COLUMNS`].
    fn values(&self) -> Vec<String>;
}

/// MIME type for CSV responses.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Quote a cell if needed.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_row<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>) {
    let line: Vec<String> = cells.into_iter().map(escape_field).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Render the header plus one row per record.
pub fn write_csv<T: CsvRecord>(records: &[T]) -> String {
    let mut out = String::new();
    push_row(&mut out, T::COLUMNS.iter().copied());
    for record in records {
        let values = record.values();
        push_row(&mut out, values.iter().map(String::as_str));
    }
    out
}

/// `Content-Disposition` value for a downloadable file.
pub fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{filename}\"")
}

/// Format an optional value, rendering `None` as an empty cell.
pub fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
