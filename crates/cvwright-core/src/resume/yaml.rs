//! YAML emission and parsing for resume documents.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::document::ResumeDocument;
use crate::{Error, Result};

/// Content that opens a literal or folded block scalar, e.g. `summary: |-` or `>`
#[allow(clippy::expect_used)]
static BLOCK_SCALAR_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|: )[|>][-+]?[1-9]?[-+]?$").expect("valid regex"));

/// Serialize a document with sequences indented under their parent key.
pub fn to_yaml_string(doc: &ResumeDocument) -> Result<String> {
    let raw = serde_yaml_ng::to_string(doc.as_map())?;
    let mut out = indent_yaml_sequences(&raw);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Parse YAML text whose root must be a mapping. `origin` names the source in errors.
///
/// Scalar mapping keys such as `2020:` or `true:` are kept as their string form.
pub fn from_yaml_str(text: &str, origin: &str) -> Result<ResumeDocument> {
    let parsed: serde_yaml_ng::Value = serde_yaml_ng::from_str(text)?;
    if !parsed.is_mapping() {
        return Err(Error::InvalidInput(format!(
            "Invalid YAML structure in {origin}"
        )));
    }
    match yaml_to_json(parsed, origin)? {
        Value::Object(map) => Ok(ResumeDocument::new(map)),
        _ => Err(Error::InvalidInput(format!(
            "Invalid YAML structure in {origin}"
        ))),
    }
}

fn yaml_to_json(value: serde_yaml_ng::Value, origin: &str) -> Result<Value> {
    use serde_yaml_ng::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(|item| yaml_to_json(item, origin))
                .collect::<Result<_>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(key_to_string(key, origin)?, yaml_to_json(value, origin)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value, origin)?,
    })
}

fn key_to_string(key: serde_yaml_ng::Value, origin: &str) -> Result<String> {
    use serde_yaml_ng::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => key_to_string(tagged.value, origin),
        Yaml::Sequence(_) | Yaml::Mapping(_) => Err(Error::InvalidInput(format!(
            "Unsupported collection used as a mapping key in {origin}"
        ))),
    }
}

/// Shift every sequence two spaces right of its parent key so items sit at
/// the key's indent plus two and their content at plus four:
///
/// ```yaml
/// # Before:           # After:
/// highlights:         highlights:
/// - Led a team          - Led a team
/// sections:           sections:
///   experience:         experience:
///   - company: Acme       - company: Acme
///     position: CTO         position: CTO
/// ```
///
/// A compact nested item such as `- - a` opens one sequence per dash, and
/// each dash moves with its own sequence. Block scalar bodies move with their
/// header line and are never scanned for sequence markers.
fn indent_yaml_sequences(yaml: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    // Columns at which open sequences start
    let mut seq_indents: Vec<usize> = Vec::new();
    // Parent column of an open block scalar and the shift applied to its header
    let mut block: Option<(usize, usize)> = None;

    for line in yaml.lines() {
        let trimmed = line.trim_start();

        if trimmed.is_empty() {
            result.push(line.to_string());
            continue;
        }

        let indent = line.len() - trimmed.len();

        if let Some((parent, extra)) = block {
            if indent > parent {
                result.push(format!("{}{}", " ".repeat(extra), line));
                continue;
            }
            block = None;
        }

        let (markers, content_col) = sequence_markers(line, indent);
        let is_item = !markers.is_empty();

        while let Some(&seq_indent) = seq_indents.last() {
            if indent < seq_indent || (indent == seq_indent && !is_item) {
                seq_indents.pop();
            } else {
                break;
            }
        }

        // Target column of each dash after shifting
        let mut dash_cols = Vec::with_capacity(markers.len());
        for (i, &col) in markers.iter().enumerate() {
            if i > 0 || seq_indents.last() != Some(&col) {
                seq_indents.push(col);
            }
            dash_cols.push(col + seq_indents.len() * 2);
        }

        let extra = seq_indents.len() * 2;
        let content = &line[content_col..];
        if BLOCK_SCALAR_HEADER.is_match(content) {
            let parent = match markers.last() {
                Some(&dash) if content.starts_with(['|', '>']) => dash,
                _ => content_col,
            };
            block = Some((parent, extra));
        }

        if extra == 0 {
            result.push(line.to_string());
            continue;
        }

        let mut shifted = String::with_capacity(line.len() + extra);
        for col in dash_cols {
            pad_to(&mut shifted, col);
            shifted.push('-');
        }
        if !content.is_empty() {
            pad_to(&mut shifted, content_col + extra);
            shifted.push_str(content);
        }
        result.push(shifted);
    }

    result.join("\n")
}

/// Columns of the leading `-` item markers of `line` and the column where the
/// rest of the line starts.
fn sequence_markers(line: &str, indent: usize) -> (Vec<usize>, usize) {
    let mut markers = Vec::new();
    let mut col = indent;
    loop {
        let rest = &line[col..];
        if rest == "-" {
            markers.push(col);
            return (markers, line.len());
        }
        if !rest.starts_with("- ") {
            return (markers, col);
        }
        markers.push(col);
        col += 1;
        col += line[col..].len() - line[col..].trim_start_matches(' ').len();
    }
}

fn pad_to(out: &mut String, col: usize) {
    while out.len() < col {
        out.push(' ');
    }
}
