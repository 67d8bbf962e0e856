// src/content/frontmatter.rs
// =============================================================================
// Splits a Markdown/MDX document into its YAML front-matter and body.
//
// A document with front-matter starts like this:
//
//   ---
//   title: Hello
//   published: 2021-06-15
//   ---
//   The body starts here.
//
// No leading '---' line means no front-matter: empty metadata, whole text
// is body. A '---' block that isn't valid YAML is an error.
// =============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::macros::format_description;
use time::Date;

/// Metadata from the top of a post's index document.
///
/// The common keys get their own fields; everything else lands in `extra`
/// so nothing the author wrote is lost.
///
/// Reading is lenient: a common key holding an unexpected shape
/// (`title: [a, b]`) leaves its field empty and keeps the raw value in
/// `extra`. Only YAML that doesn't parse at all is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl From<BTreeMap<String, Value>> for Frontmatter {
    fn from(mut map: BTreeMap<String, Value>) -> Self {
        Frontmatter {
            title: take_text(&mut map, "title"),
            published: take_text(&mut map, "published"),
            description: take_text(&mut map, "description"),
            tags: take_tags(&mut map),
            extra: map,
        }
    }
}

// Strings, numbers and booleans all read as text
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn take_text(map: &mut BTreeMap<String, Value>, key: &str) -> Option<String> {
    let value = map.remove(key)?;
    if value.is_null() {
        return None;
    }
    let text = scalar_text(&value);
    if text.is_none() {
        // Not ours to interpret; hand it back untouched
        map.insert(key.to_string(), value);
    }
    text
}

// `tags: rust` is one tag; a list of scalars is the usual form
fn take_tags(map: &mut BTreeMap<String, Value>) -> Vec<String> {
    let Some(value) = map.remove("tags") else {
        return Vec::new();
    };
    let tags = match &value {
        Value::Null => Some(Vec::new()),
        Value::Array(items) => items.iter().map(scalar_text).collect(),
        scalar => scalar_text(scalar).map(|tag| vec![tag]),
    };
    match tags {
        Some(tags) => tags,
        None => {
            map.insert("tags".to_string(), value);
            Vec::new()
        }
    }
}

impl Frontmatter {
    /// The publish date, read from the leading `YYYY-MM-DD` of `published`.
    /// Datetimes like "2021-06-15T10:00:00Z" therefore sort by their day.
    pub fn published_date(&self) -> Option<Date> {
        let published = self.published.as_deref()?.trim();
        let day = published.get(..10)?;
        Date::parse(day, format_description!("[year]-[month]-[day]")).ok()
    }
}

/// A document split at its front-matter fence.
#[derive(Debug, PartialEq)]
pub struct Document<'a> {
    /// The YAML between the fences, if there were fences.
    pub matter: Option<&'a str>,
    pub body: &'a str,
}

/// Finds the front-matter block without parsing it.
pub fn split(text: &str) -> Document<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(after_open) = strip_fence(text) else {
        return Document {
            matter: None,
            body: text,
        };
    };

    // Walk line by line looking for the closing fence
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Document {
                matter: Some(&after_open[..offset]),
                body: &after_open[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    // Opened but never closed: treat it all as body
    Document {
        matter: None,
        body: text,
    }
}

// "---\n..." -> "..."; None when the first line isn't exactly a fence
fn strip_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Parses only the front-matter of `text`.
pub fn parse(text: &str) -> Result<Frontmatter, serde_yaml::Error> {
    parse_matter(split(text).matter)
}

pub(crate) fn parse_matter(matter: Option<&str>) -> Result<Frontmatter, serde_yaml::Error> {
    match matter {
        // An empty block deserializes as YAML null, not as an empty map
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml),
        _ => Ok(Frontmatter::default()),
    }
}
