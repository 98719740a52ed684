//! Front-matter schema validation
//!
//! The raw block is parsed into a generic value tree first, then every known
//! field is checked by hand so that a wrong type is reported against the
//! field that carries it instead of being coerced.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use super::frontmatter::{FrontMatterFormat, RawFrontMatter};
use super::{ContentError, Metadata};

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const PUB_DATE: &str = "pubDate";
pub const TAGS: &str = "tags";
pub const DRAFT: &str = "draft";

const KNOWN_FIELDS: [&str; 5] = [TITLE, DESCRIPTION, PUB_DATE, TAGS, DRAFT];

/// Keys the entry itself serializes next to the metadata; never copied into
/// `extra` so they cannot shadow the file-derived values
const RESERVED_FIELDS: [&str; 3] = ["id", "body", "source"];

/// Validate a raw front-matter block into typed metadata
pub fn validate(raw: &RawFrontMatter<'_>) -> Result<Metadata, ContentError> {
    let mapping = parse_mapping(raw)?;
    from_mapping(&mapping)
}

/// Validate an already parsed mapping
pub fn from_mapping(map: &Mapping) -> Result<Metadata, ContentError> {
    let title = required_string(map, TITLE)?;
    let description = required_string(map, DESCRIPTION)?;
    let pub_date = required_date(map, PUB_DATE)?;
    let tags = tag_list(map)?;
    let draft = match field(map, DRAFT) {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => return Err(ContentError::mismatch(DRAFT, "a boolean")),
    };

    let extra: IndexMap<String, Value> = map
        .iter()
        .filter_map(|(k, v)| match k {
            Value::String(key) if RESERVED_FIELDS.contains(&key.as_str()) => {
                tracing::warn!("Ignoring reserved front-matter key `{}`", key);
                None
            }
            Value::String(key) if !KNOWN_FIELDS.contains(&key.as_str()) => {
                Some((key.clone(), v.clone()))
            }
            _ => None,
        })
        .collect();

    Ok(Metadata {
        title,
        description,
        pub_date,
        tags,
        draft,
        extra,
    })
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_mapping(raw: &RawFrontMatter<'_>) -> Result<Mapping, ContentError> {
    let value = match raw.format {
        FrontMatterFormat::Yaml => parse_yaml(raw)?,
        FrontMatterFormat::Toml => parse_toml(raw)?,
    };

    match value {
        Value::Mapping(map) => Ok(map),
        // An empty block has no fields at all
        Value::Null => Ok(Mapping::new()),
        _ => Err(ContentError::MalformedFrontmatter {
            message: "front-matter must be a mapping of keys to values".to_string(),
            line: Some(raw.first_line),
            column: Some(1),
        }),
    }
}

fn parse_yaml(raw: &RawFrontMatter<'_>) -> Result<Value, ContentError> {
    serde_yaml::from_str::<Value>(raw.text).map_err(|e| {
        let location = e.location();
        ContentError::MalformedFrontmatter {
            message: e.to_string(),
            line: location.as_ref().map(|l| raw.first_line + l.line() - 1),
            column: location.as_ref().map(|l| l.column()),
        }
    })
}

fn parse_toml(raw: &RawFrontMatter<'_>) -> Result<Value, ContentError> {
    let table = raw.text.parse::<toml::Table>().map_err(|e| {
        let (line, column) = match e.span() {
            Some(span) => {
                let (l, c) = line_column(raw.text, span.start);
                (Some(raw.first_line + l - 1), Some(c))
            }
            None => (None, None),
        };
        ContentError::MalformedFrontmatter {
            message: e.message().to_string(),
            line,
            column,
        }
    })?;
    Ok(toml_to_yaml(toml::Value::Table(table)))
}

/// 1-based line and column of a byte offset
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map(|nl| before[nl + 1..].chars().count())
        .unwrap_or_else(|| before.chars().count())
        + 1;
    (line, column)
}

fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (Value::String(k), toml_to_yaml(v)))
                .collect(),
        ),
    }
}

/// Look up a field, treating an explicit null like an absent key
fn field<'a>(map: &'a Mapping, name: &str) -> Option<&'a Value> {
    match map.get(name) {
        None | Some(Value::Null) => None,
        Some(v) => Some(v),
    }
}

fn required_string(map: &Mapping, name: &str) -> Result<String, ContentError> {
    match field(map, name) {
        None => Err(ContentError::MissingRequiredField(name.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ContentError::MissingRequiredField(name.to_string()))
        }
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ContentError::mismatch(name, "a string")),
    }
}

fn required_date(map: &Mapping, name: &str) -> Result<NaiveDate, ContentError> {
    match field(map, name) {
        None => Err(ContentError::MissingRequiredField(name.to_string())),
        Some(Value::String(s)) => parse_date(s.trim())
            .ok_or_else(|| ContentError::mismatch(name, "an ISO-8601 date (YYYY-MM-DD)")),
        Some(_) => Err(ContentError::mismatch(
            name,
            "an ISO-8601 date (YYYY-MM-DD)",
        )),
    }
}

fn tag_list(map: &Mapping) -> Result<Vec<String>, ContentError> {
    let items = match field(map, TAGS) {
        None => return Ok(Vec::new()),
        Some(Value::Sequence(items)) => items,
        // A bare string is not promoted to a one-element list
        Some(_) => return Err(ContentError::mismatch(TAGS, "a list of strings")),
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_lowercase()),
            _ => Err(ContentError::mismatch(TAGS, "a list of non-empty strings")),
        })
        .collect()
}
