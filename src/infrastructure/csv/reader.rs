// ============================================================
// DELIMITED TEXT READER
// ============================================================
// Turn loosely-structured CSV text into header + string records:
// encoding decode, BOM stripping, delimiter detection, quoting

use csv::{ReaderBuilder, Trim};

use crate::domain::error::{AppError, Result};
use crate::domain::schema;

/// A parsed delimited file: normalized headers plus cleaned string cells.
#[derive(Debug, Clone)]
pub struct DelimitedTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
    pub delimiter: u8,
}

impl DelimitedTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decode raw upload bytes to text. UTF-8 with BOM sniffing and lossy
/// replacement of invalid sequences; exports from spreadsheet tools are not
/// reliably clean.
pub fn decode_bytes(raw: &[u8]) -> String {
    let (text, _, _) = encoding_rs::UTF_8.decode(raw);
    text.into_owned()
}

pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// First logical line of the text. A newline inside an open quote does not
/// end the header, so a quoted multi-line header cell stays intact.
fn header_line(text: &str) -> &str {
    let mut in_quotes = false;
    for (idx, ch) in text.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\n' | '\r' if !in_quotes => return &text[..idx],
            _ => {}
        }
    }
    text
}

/// Comma by default; semicolon only when it strictly outnumbers commas in the
/// header line and occurs at least once.
pub fn detect_delimiter(header: &str) -> u8 {
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if semicolons > commas && semicolons > 0 {
        b';'
    } else {
        b','
    }
}

/// Trim a cell and strip one layer of surrounding quotes, unescaping doubled
/// quotes inside it.
pub fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1]
            .replace("\"\"", "\"")
            .trim()
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse delimited text into a table. Structural problems (empty input,
/// unreadable header) fail fast; cell-level noise is left to downstream
/// typing, which degrades to sentinels instead of erroring.
pub fn read_table(raw_text: &str) -> Result<DelimitedTable> {
    let text = strip_bom(raw_text);
    if text.trim().is_empty() {
        return Err(AppError::ParseError("The file is empty".to_string()));
    }

    let delimiter = detect_delimiter(header_line(text));

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(schema::normalize_header)
        .collect();

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
        })?;
        records.push(record.iter().map(clean_cell).collect());
    }

    Ok(DelimitedTable {
        headers,
        records,
        delimiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_semicolon_only_when_it_outnumbers_comma() {
        assert_eq!(detect_delimiter("Keyword;Pos;URL"), b';');
        assert_eq!(detect_delimiter("Keyword,Pos,URL"), b',');
        // Tie goes to comma.
        assert_eq!(detect_delimiter("a;b,c"), b',');
        assert_eq!(detect_delimiter("plain header"), b',');
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let table = read_table("a,b,c\nfoo,\"bar, baz\",qux").unwrap();
        assert_eq!(table.records[0], vec!["foo", "bar, baz", "qux"]);
    }

    #[test]
    fn doubled_quotes_unescape() {
        let table = read_table("a\n\"he said \"\"hi\"\"\"").unwrap();
        assert_eq!(table.records[0][0], "he said \"hi\"");
    }

    #[test]
    fn bom_is_stripped_before_header_resolution() {
        let table = read_table("\u{feff}Keyword,Pos\nshoes,3").unwrap();
        assert_eq!(table.headers[0], "Keyword");
    }

    #[test]
    fn quoted_newline_does_not_split_the_header() {
        let text = "a,\"multi\nline header\",c\n1,2,3";
        let table = read_table(text).unwrap();
        assert_eq!(table.delimiter, b',');
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.headers[1], "multi line header");
        assert_eq!(table.records[0], vec!["1", "2", "3"]);
    }

    #[test]
    fn empty_input_is_a_structural_error() {
        assert!(read_table("").is_err());
        assert!(read_table("   \n  ").is_err());
    }

    #[test]
    fn decode_bytes_handles_utf8_bom() {
        let bytes = b"\xef\xbb\xbfKeyword\nshoes";
        let text = decode_bytes(bytes);
        assert!(strip_bom(&text).starts_with("Keyword"));
    }
}
