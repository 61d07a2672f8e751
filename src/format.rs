//! Text rendering of responses for the command line.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt::Write;

use crate::response::Response;

const JSON_INDENT: &[u8] = b"    ";

/// Renders status line, headers and body in the fixed CLI layout.
pub fn format_response(response: &Response) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Status Code: {}", response.status());
    out.push_str("\nHeaders:\n");
    for (key, value) in response.headers() {
        let _ = writeln!(out, "{}: {}", key, value);
    }
    out.push_str("\nResponse Body:\n");
    out.push_str(&format_body(response));
    out.push('\n');

    out
}

/// Pretty-prints JSON bodies, returns anything else verbatim.
pub fn format_body(response: &Response) -> String {
    let is_json = response
        .content_type()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

    if is_json {
        if let Some(pretty) = pretty_json(response.bytes()) {
            return pretty;
        }
    }

    response.text()
}

fn pretty_json(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut ser).ok()?;

    String::from_utf8(buf).ok()
}
