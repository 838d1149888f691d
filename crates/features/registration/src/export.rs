//! CSV rendering of stored documents.

use serde_json::{Map, Value};

/// A stored record as an ordered key/value map.
pub type Document = Map<String, Value>;

/// Renders `documents` as CSV.
///
/// The header is the first document's keys in order. Strings are quoted with
/// inner `"` doubled, numbers and booleans are written bare, `null` and keys a
/// later document lacks become empty cells, and arrays or objects are written as
/// quoted compact JSON. Rows are joined with `\n` with no trailing newline; no
/// documents gives an empty string.
#[must_use]
pub fn to_csv(documents: &[Document]) -> String {
    let Some(first) = documents.first() else {
        return String::new();
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut out = headers.join(",");
    for document in documents {
        out.push('\n');
        for (i, header) in headers.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if let Some(value) = document.get(*header) {
                write_cell(&mut out, value);
            }
        }
    }
    out
}

fn write_cell(out: &mut String, value: &Value) {
    match value {
        Value::Null => {},
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_quoted(out, s),
        nested @ (Value::Array(_) | Value::Object(_)) => write_quoted(out, &nested.to_string()),
    }
}

fn write_quoted(out: &mut String, text: &str) {
    out.push('"');
    out.push_str(&text.replace('"', "\"\""));
    out.push('"');
}
