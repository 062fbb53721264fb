use tracing::debug;

use crate::data::{Row, Value};
use crate::domain::MejaError;

/// Parses comma delimited text into a header list and a row sequence.
///
/// The whole text is trimmed first and split into lines on `\n` or `\r\n`.
/// The first line is the header; fewer than two lines fail with
/// `MalformedInput`. Ragged data lines are normalized silently: short lines
/// pad the trailing columns with empty strings, long lines drop the extra
/// fields. Every cell comes back as a string, numeric interpretation is left
/// to the consumer.
pub fn parse_csv(text: &str) -> Result<(Vec<String>, Vec<Row>), MejaError> {
    let trimmed = text.trim();
    let lines: Vec<&str> = trimmed
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    if lines.len() < 2 {
        return Err(MejaError::MalformedInput(
            "expected a header line and at least one data row".to_string(),
        ));
    }

    let headers: Vec<String> = lines[0].split(',').map(clean_field).collect();

    let rows: Vec<Row> = lines[1..]
        .iter()
        .map(|line| parse_record(&headers, line))
        .collect();

    debug!(
        "Ingested {} columns and {} rows",
        headers.len(),
        rows.len()
    );
    Ok((headers, rows))
}

/// Parses a single comma delimited line into a row over the given headers,
/// with the same split, trim and padding rules as [`parse_csv`].
pub fn parse_record(headers: &[String], line: &str) -> Row {
    let values = split_line(line);
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let cell = values.get(idx).map(|v| clean_field(v)).unwrap_or_default();
            (header.clone(), Value::Str(cell))
        })
        .collect()
}

/// Splits a data line on commas that sit outside a double quoted field. A
/// comma is a separator when the number of quote characters to its right
/// within the line is even. This is a lookahead split, not an RFC 4180
/// tokenizer; escaped quotes (`""`) are not handled and will mis-split.
fn split_line(line: &str) -> Vec<&str> {
    let total_quotes = line.bytes().filter(|&b| b == b'"').count();
    let mut fields = Vec::new();
    let mut start = 0;
    let mut seen_quotes = 0;
    for (idx, byte) in line.bytes().enumerate() {
        match byte {
            b'"' => seen_quotes += 1,
            b',' if (total_quotes - seen_quotes) % 2 == 0 => {
                fields.push(&line[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Trims a raw field and strips one layer of enclosing double quotes.
fn clean_field(field: &str) -> String {
    let trimmed = field.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn cell(row: &Row, column: &str) -> String {
        row.get(column).cloned().unwrap_or(Value::Missing).render()
    }

    #[test]
    fn parses_headers_and_rows_in_order() {
        let (headers, rows) = parse_csv("Name,Age\nAnn,30\nBob,25").unwrap();
        assert_eq!(headers, vec!["Name", "Age"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(cell(&rows[0], "Name"), "Ann");
        assert_eq!(cell(&rows[1], "Age"), "25");
    }

    #[test]
    fn rejects_empty_and_header_only_input() {
        assert!(matches!(
            parse_csv(""),
            Err(MejaError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_csv("Name,Age\n"),
            Err(MejaError::MalformedInput(_))
        ));
        // One header line and one data line is the smallest valid input.
        let (_, rows) = parse_csv("Name,Age\nAnn,30").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn handles_crlf_line_endings_and_outer_whitespace() {
        let (headers, rows) = parse_csv("\n\nName,Age\r\nAnn,30\r\n\n").unwrap();
        assert_eq!(headers, vec!["Name", "Age"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(cell(&rows[0], "Name"), "Ann");
    }

    #[test]
    fn quoted_comma_stays_in_one_field() {
        let (_, rows) = parse_csv("Name,Age\n\"Smith, Jr\",40").unwrap();
        assert_eq!(cell(&rows[0], "Name"), "Smith, Jr");
        assert_eq!(cell(&rows[0], "Age"), "40");
    }

    #[test]
    fn strips_one_layer_of_quotes_and_trims_fields() {
        let (headers, rows) = parse_csv("\"Name\" , Age\n \"Ann\" , 30 ").unwrap();
        assert_eq!(headers, vec!["Name", "Age"]);
        assert_eq!(cell(&rows[0], "Name"), "Ann");
        assert_eq!(cell(&rows[0], "Age"), "30");
    }

    #[test]
    fn short_rows_pad_and_long_rows_truncate() {
        let (_, rows) = parse_csv("A,B,C\n1,2\n1,2,3,4").unwrap();
        assert_eq!(cell(&rows[0], "C"), "");
        assert_eq!(rows[1].len(), 3);
        assert_eq!(cell(&rows[1], "C"), "3");
    }

    #[test]
    fn round_trips_plain_values() {
        let text = "Name,City\nAnn,Jakarta\nBob,Bandung\nCleo,Surabaya";
        let (headers, rows) = parse_csv(text).unwrap();
        let rendered: Vec<String> = std::iter::once(headers.join(","))
            .chain(rows.iter().map(|row| {
                headers
                    .iter()
                    .map(|h| cell(row, h))
                    .collect::<Vec<_>>()
                    .join(",")
            }))
            .collect();
        let (headers2, rows2) = parse_csv(&rendered.join("\n")).unwrap();
        assert_eq!(headers, headers2);
        assert_eq!(rows, rows2);
    }

    #[test]
    fn single_record_follows_the_line_rules() {
        let headers = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let row = parse_record(&headers, "1, \"x, y\" ");
        assert_eq!(cell(&row, "A"), "1");
        assert_eq!(cell(&row, "B"), "x, y");
        assert_eq!(cell(&row, "C"), "");
    }

    #[test]
    fn parses_the_bundled_fixture() {
        let text = std::fs::read_to_string("tests/fixtures/transactions.csv").unwrap();
        let (headers, rows) = parse_csv(&text).unwrap();
        assert_eq!(headers[0], "Date");
        assert!(rows.len() >= 3);
        // The fixture contains a quoted customer name with an embedded comma.
        assert!(rows.iter().any(|r| cell(r, "Customer").contains(',')));
    }
}
