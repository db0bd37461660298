//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Token delimiting the front-matter block
pub const SEPARATOR: &str = "---";

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Accepts any YAML scalar for `CreatedAt` and parses it as a timestamp
fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    let text = match value {
        None | Some(serde_yaml::Value::Null) => return Ok(None),
        Some(serde_yaml::Value::String(s)) => s,
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(D::Error::custom(format!(
                "CreatedAt must be a timestamp, got {:?}",
                other
            )))
        }
    };

    if text.trim().is_empty() {
        return Ok(None);
    }

    parse_date_string(&text)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("unrecognised CreatedAt timestamp {:?}", text)))
}

/// Front-matter data from a content file
///
/// Every field is optional; absent keys keep their zero value and unknown
/// keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Synopsis")]
    pub synopsis: String,
    #[serde(rename = "CreatedAt", deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "Tags", deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(rename = "ArticleID")]
    pub article_id: Option<i64>,
}

impl FrontMatter {
    /// Parse the YAML mapping between the two separators
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }
        serde_yaml::from_str(yaml)
    }
}

/// The three segments of a well-formed content file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments<'a> {
    pub front_matter: &'a str,
    pub body: &'a str,
}

/// Split a content file into front matter and body.
///
/// The separator must occur exactly twice and nothing but whitespace (or a
/// byte-order mark) may precede the first one. Returns the reason on failure.
pub fn split(content: &str) -> Result<Segments<'_>, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let count = content.matches(SEPARATOR).count();
    if count != 2 {
        return Err(format!(
            "expected exactly 2 `{}` separators, found {}",
            SEPARATOR, count
        ));
    }

    let mut parts = content.splitn(3, SEPARATOR);
    let (Some(preamble), Some(front_matter), Some(body)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err("content does not split into three segments".to_string());
    };

    if !preamble.trim().is_empty() {
        return Err(format!(
            "unexpected text before the opening `{}` separator",
            SEPARATOR
        ));
    }

    Ok(Segments {
        front_matter,
        body: body.trim_start_matches(['\n', '\r']),
    })
}

/// Parse a date string in various formats, as UTC
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    // Date only
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
    }

    // YAML timestamps with a space before the offset, e.g. "2023-01-01 10:00:00 +02:00"
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %:z") {
        return Some(dt.with_timezone(&Utc));
    }

    None
}
