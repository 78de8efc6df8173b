//! Text-to-text conversions: Markdown rendering, HTML flattening, CSV,
//! JSON and YAML handling.

use crate::{ConvertError, ConvertResult};
use pulldown_cmark::{Parser, html};

/// Line width when flattening rendered Markdown to plain text.
const MARKDOWN_WRAP_WIDTH: usize = 150;
/// Line width when flattening stored HTML to plain text.
const HTML_WRAP_WIDTH: usize = 130;

/// Tags treated as line breaks when flattening HTML.
const BLOCK_TAGS: [&str; 17] = [
    "p", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "div", "blockquote", "pre",
    "tr", "table", "hr",
];

fn as_utf8(data: &[u8]) -> ConvertResult<&str> {
    std::str::from_utf8(data).map_err(|err| ConvertError::Parse(err.to_string()))
}

/// Renders Markdown to an HTML document.
pub fn markdown_to_html(data: &[u8]) -> ConvertResult<Vec<u8>> {
    let source = as_utf8(data)?;
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, Parser::new(source));
    Ok(out.into_bytes())
}

/// Renders Markdown to HTML, then flattens the markup to wrapped plain text.
pub fn markdown_to_text(data: &[u8]) -> ConvertResult<Vec<u8>> {
    let rendered = markdown_to_html(data)?;
    let rendered = String::from_utf8(rendered).map_err(|err| ConvertError::Parse(err.to_string()))?;
    Ok(flatten_html(&rendered, MARKDOWN_WRAP_WIDTH).into_bytes())
}

/// Flattens a stored HTML payload to wrapped plain text.
pub fn html_to_text(data: &[u8]) -> ConvertResult<Vec<u8>> {
    let source = as_utf8(data)?;
    Ok(flatten_html(source, HTML_WRAP_WIDTH).into_bytes())
}

/// Parses CSV (header row, comma delimiter, blank lines skipped) and
/// serializes the rows as pretty-printed JSON objects keyed by header.
pub fn csv_to_json(data: &[u8]) -> ConvertResult<Vec<u8>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|err| ConvertError::Parse(err.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| ConvertError::Parse(err.to_string()))?;
        let mut row = serde_json::Map::with_capacity(headers.len());
        for (header, field) in headers.iter().zip(record.iter()) {
            row.insert(
                header.to_string(),
                serde_json::Value::String(field.to_string()),
            );
        }
        rows.push(serde_json::Value::Object(row));
    }

    serde_json::to_vec_pretty(&rows).map_err(|err| ConvertError::Parse(err.to_string()))
}

/// Parses JSON and re-serializes it pretty-printed (a validation pass).
pub fn json_pretty(data: &[u8]) -> ConvertResult<Vec<u8>> {
    let value: serde_json::Value =
        serde_json::from_slice(data).map_err(|err| ConvertError::Parse(err.to_string()))?;
    serde_json::to_vec_pretty(&value).map_err(|err| ConvertError::Parse(err.to_string()))
}

/// Parses JSON and dumps it as YAML.
pub fn json_to_yaml(data: &[u8]) -> ConvertResult<Vec<u8>> {
    let value: serde_json::Value =
        serde_json::from_slice(data).map_err(|err| ConvertError::Parse(err.to_string()))?;
    serde_yaml::to_string(&value)
        .map(String::into_bytes)
        .map_err(|err| ConvertError::Parse(err.to_string()))
}

/// YAML is already text: the bytes pass through after UTF-8 validation.
pub fn yaml_to_text(data: &[u8]) -> ConvertResult<Vec<u8>> {
    as_utf8(data)?;
    Ok(data.to_vec())
}

/// Strips markup from an HTML document and re-flows the text to `width`
/// columns. Handles the tag and entity forms rendered Markdown produces;
/// not a general-purpose HTML parser.
fn flatten_html(input: &str, width: usize) -> String {
    let mut text = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                let mut tag = String::new();
                for t in chars.by_ref() {
                    if t == '>' {
                        break;
                    }
                    tag.push(t);
                }
                let name = tag
                    .trim_start_matches('/')
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if BLOCK_TAGS.contains(&name.as_str()) {
                    text.push('\n');
                }
            }
            '&' => {
                let mut entity = String::new();
                let mut terminated = false;
                while let Some(&next) = chars.peek() {
                    if next == ';' {
                        chars.next();
                        terminated = true;
                        break;
                    }
                    if !(next.is_ascii_alphanumeric() || next == '#') || entity.len() >= 8 {
                        break;
                    }
                    entity.push(next);
                    chars.next();
                }
                match (terminated, decode_entity(&entity)) {
                    (true, Some(decoded)) => text.push(decoded),
                    (true, None) => {
                        text.push('&');
                        text.push_str(&entity);
                        text.push(';');
                    }
                    (false, _) => {
                        text.push('&');
                        text.push_str(&entity);
                    }
                }
            }
            _ => text.push(c),
        }
    }

    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        wrap_line(line, width, &mut out);
    }
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" | "#160" => Some(' '),
        _ => None,
    }
}

/// Re-flows one logical line at word boundaries. Words longer than the
/// width are emitted unbroken.
fn wrap_line(line: &str, width: usize, out: &mut String) {
    let mut column = 0;
    for word in line.split_whitespace() {
        if column > 0 {
            if column + 1 + word.len() > width {
                out.push('\n');
                column = 0;
            } else {
                out.push(' ');
                column += 1;
            }
        }
        out.push_str(word);
        column += word.len();
    }
}
