//! PHP literals: single values and nested `array(...)` expressions.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use snafu::prelude::*;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::OnceLock;

use crate::model::*;

const PHP_NULL: &str = "null";

const PHP_STRING_LITERAL: char = '\'';

const INDENT: char = '\t';

/// A raw value, before it is checked against the kind of its placeholder.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Scalar {
    Integer(i64),
    Text(String),
    Date(NaiveDate),
    Null,
}

impl Scalar {
    /// Converts a vote or ballot count. PHP integers are signed 64 bit.
    pub fn count(value: u64) -> RenderResult<Scalar> {
        i64::try_from(value)
            .ok()
            .map(Scalar::Integer)
            .context(FormatSnafu {
                kind: LeafKind::Integer.to_string(),
                found: format!("count {}", value),
            })
    }

    fn describe(&self) -> String {
        match self {
            Scalar::Integer(i) => format!("integer {}", i),
            Scalar::Text(s) => format!("text {:?}", s),
            Scalar::Date(d) => format!("date {}", d),
            Scalar::Null => PHP_NULL.to_string(),
        }
    }
}

/// The declared kind of a placeholder or array value.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum LeafKind {
    Integer,
    /// Four digit year, taken from a date.
    Year,
    /// Machine readable text such as party keys.
    String,
    /// Human readable text such as names. Formatted like `String`.
    Label,
}

impl Display for LeafKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LeafKind::Integer => "integer",
            LeafKind::Year => "year",
            LeafKind::String => "string",
            LeafKind::Label => "label",
        };
        write!(f, "{}", name)
    }
}

/// Formats `value` as a PHP literal of the given kind.
///
/// `Null` is accepted for every kind except `Year` and renders as `null`.
pub fn format_value(value: &Scalar, kind: LeafKind) -> RenderResult<String> {
    match (kind, value) {
        (LeafKind::Integer, Scalar::Integer(i)) => Ok(i.to_string()),
        (LeafKind::Year, Scalar::Date(d)) => format_year(i64::from(d.year())),
        (LeafKind::Year, Scalar::Integer(y)) => format_year(*y),
        (LeafKind::String | LeafKind::Label, Scalar::Text(s)) => Ok(quote(s)),
        (LeafKind::Integer | LeafKind::String | LeafKind::Label, Scalar::Null) => {
            Ok(PHP_NULL.to_string())
        }
        (kind, value) => FormatSnafu {
            kind: kind.to_string(),
            found: value.describe(),
        }
        .fail(),
    }
}

fn format_year(year: i64) -> RenderResult<String> {
    ensure!(
        (1000..=9999).contains(&year),
        FormatSnafu {
            kind: LeafKind::Year.to_string(),
            found: format!("year {}", year),
        }
    );
    Ok(year.to_string())
}

/// Creates a single quoted PHP string literal.
///
/// Only the quote and the backslash have a meaning inside single quotes,
/// everything else (umlauts, line breaks) is kept as is.
pub fn quote(value: &str) -> String {
    let mut res = String::with_capacity(value.len() + 2);
    res.push(PHP_STRING_LITERAL);
    for c in value.chars() {
        if c == '\\' || c == PHP_STRING_LITERAL {
            res.push('\\');
        }
        res.push(c);
    }
    res.push(PHP_STRING_LITERAL);
    res
}

/// Strips a display name down to a key usable on the website.
///
/// ```
/// use awg_website::literal::identifier;
///
/// assert_eq!(identifier("Klein Boden"), "klein-boden");
/// assert_eq!(identifier("Gäde, Jan-Hendrik"), "gaede-jan-hendrik");
/// ```
pub fn identifier(value: &str) -> String {
    static MAKE_DASH: OnceLock<Regex> = OnceLock::new();
    static REMOVE: OnceLock<Regex> = OnceLock::new();
    let make_dash =
        MAKE_DASH.get_or_init(|| Regex::new("[^a-z0-9]+").expect("static pattern"));
    let remove = REMOVE.get_or_init(|| Regex::new("(^[-0-9]+)|(-+$)").expect("static pattern"));

    let lowered = value
        .to_lowercase()
        .replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
        .replace('ß', "ss");
    let dashed = make_dash.replace_all(&lowered, "-");
    remove.replace_all(&dashed, "").into_owned()
}

// ******** Array structures *********

/// A value together with the kind it must be formatted as.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Leaf {
    pub kind: LeafKind,
    pub value: Scalar,
}

impl Leaf {
    pub fn integer(value: i64) -> Leaf {
        Leaf {
            kind: LeafKind::Integer,
            value: Scalar::Integer(value),
        }
    }

    pub fn count(value: u64) -> RenderResult<Leaf> {
        Ok(Leaf {
            kind: LeafKind::Integer,
            value: Scalar::count(value)?,
        })
    }

    /// A count that may be unknown, rendered as `null` in that case.
    pub fn optional_count(value: Option<u64>) -> RenderResult<Leaf> {
        match value {
            Some(v) => Leaf::count(v),
            None => Ok(Leaf {
                kind: LeafKind::Integer,
                value: Scalar::Null,
            }),
        }
    }

    pub fn string(value: impl Into<String>) -> Leaf {
        Leaf {
            kind: LeafKind::String,
            value: Scalar::Text(value.into()),
        }
    }

    pub fn optional_string(value: Option<&str>) -> Leaf {
        Leaf {
            kind: LeafKind::String,
            value: value.map_or(Scalar::Null, |s| Scalar::Text(s.to_string())),
        }
    }

    pub fn label(value: impl Into<String>) -> Leaf {
        Leaf {
            kind: LeafKind::Label,
            value: Scalar::Text(value.into()),
        }
    }

    pub fn year(date: NaiveDate) -> Leaf {
        Leaf {
            kind: LeafKind::Year,
            value: Scalar::Date(date),
        }
    }

    pub fn format(&self) -> RenderResult<String> {
        format_value(&self.value, self.kind)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Key {
    Named(String),
    /// No key: PHP assigns the next integer index.
    Positional,
}

impl Key {
    pub fn name(&self) -> Option<&str> {
        match self {
            Key::Named(s) => Some(s.as_str()),
            Key::Positional => None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Value {
    Leaf(Leaf),
    Mapping(Mapping),
}

impl From<Leaf> for Value {
    fn from(leaf: Leaf) -> Value {
        Value::Leaf(leaf)
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Value {
        Value::Mapping(mapping)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Entry {
    pub key: Key,
    pub value: Value,
}

/// An ordered PHP array. Entries are kept exactly in insertion order, even
/// duplicates, which are only rejected when serializing.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<Entry>,
}

impl Mapping {
    pub fn new() -> Mapping {
        Mapping::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push(Entry {
            key: Key::Named(key.into()),
            value: value.into(),
        });
    }

    pub fn push_unkeyed(&mut self, value: impl Into<Value>) {
        self.entries.push(Entry {
            key: Key::Positional,
            value: value.into(),
        });
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Mapping {
        self.push(key, value);
        self
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The value of the first entry named `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|e| e.key.name() == Some(key))
            .map(|e| &e.value)
    }

    /// The named keys, in order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().filter_map(|e| e.key.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders `mapping` as a PHP `array(...)` expression.
///
/// The layout is the one of the website's data file: one entry per line,
/// indented by tabs relative to the `return` statement holding the array.
pub fn serialize(mapping: &Mapping) -> RenderResult<String> {
    serialize_in(&[], mapping)
}

/// Same as `serialize`, with `root` prefixed to the paths reported in errors.
pub(crate) fn serialize_in(root: &[&str], mapping: &Mapping) -> RenderResult<String> {
    let mut out = String::new();
    let mut path: Vec<String> = root.iter().map(|s| s.to_string()).collect();
    write_mapping(&mut out, mapping, 0, &mut path)?;
    Ok(out)
}

fn write_mapping(
    out: &mut String,
    mapping: &Mapping,
    depth: usize,
    path: &mut Vec<String>,
) -> RenderResult<()> {
    if mapping.is_empty() {
        out.push_str("array()");
        return Ok(());
    }

    let mut seen: HashSet<&str> = HashSet::new();
    out.push_str("array(");
    for (idx, entry) in mapping.entries.iter().enumerate() {
        out.push_str(if idx == 0 { "\n" } else { ",\n" });
        push_indent(out, depth + 2);
        match &entry.key {
            Key::Named(key) => {
                ensure!(
                    seen.insert(key.as_str()),
                    DuplicateKeySnafu {
                        path: describe_path(path),
                        key: key.as_str(),
                    }
                );
                out.push_str(&quote(key));
                out.push_str(" => ");
            }
            Key::Positional => {
                ensure!(
                    depth == 0,
                    SerializationSnafu {
                        path: describe_path(path),
                        message: "unkeyed entries are only allowed at the top level",
                    }
                );
            }
        }
        match &entry.value {
            Value::Leaf(leaf) => out.push_str(&leaf.format()?),
            Value::Mapping(nested) => {
                path.push(entry.key.name().map_or_else(|| idx.to_string(), str::to_string));
                write_mapping(out, nested, depth + 1, path)?;
                path.pop();
            }
        }
    }
    out.push('\n');
    push_indent(out, depth + 1);
    out.push(')');
    Ok(())
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push(INDENT);
    }
}

fn describe_path(path: &[String]) -> String {
    if path.is_empty() {
        "the top level array".to_string()
    } else {
        format!("array '{}'", path.join("/"))
    }
}
