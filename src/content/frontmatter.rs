//! Front-matter parsing

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Why a front-matter block could not be read
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter block is not closed with '---'")]
    Unterminated,

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unrecognized date '{0}'")]
    InvalidDate(String),
}

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

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
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

/// Front-matter data from a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "readingTime", skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<String>,
    #[serde(rename = "coverImage", skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Posts are published unless they say otherwise
    pub published: bool,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            date: None,
            category: None,
            tags: Vec::new(),
            slug: None,
            reading_time: None,
            cover_image: None,
            author: None,
            published: true,
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Content that does not open with a `---` line has no front-matter and is
    /// returned whole as the body.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}');

        let Some(rest) = strip_delimiter_line(content) else {
            return Ok((FrontMatter::default(), content));
        };

        // Find the closing --- on a line of its own
        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                let yaml_content = &rest[..offset];
                let remaining = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);

                if yaml_content.trim().is_empty() {
                    return Ok((FrontMatter::default(), remaining));
                }

                let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
                return Ok((fm, remaining));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unterminated)
    }

    /// Parse the date field; `Ok(None)` when the post has no date
    pub fn parse_date(&self) -> Result<Option<DateTime<Local>>, FrontMatterError> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse_date_string(s)
                .map(Some)
                .ok_or_else(|| FrontMatterError::InvalidDate(s.to_string())),
        }
    }
}

/// Returns the text after an opening `---` line, if there is one
fn strip_delimiter_line(content: &str) -> Option<&str> {
    let (first, rest) = match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    };
    (first.trim_end() == "---").then_some(rest)
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    // RFC 3339 / ISO 8601 with an offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&dt).earliest();
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&d.and_hms_opt(0, 0, 0)?).earliest();
        }
    }

    None
}
