use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::content::Content;
use crate::text_utils::{format_long_date, parse_post_date, slugify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Relato,
    Poesia,
}

impl PostType {
    pub fn label(&self) -> &'static str {
        match self {
            PostType::Relato => "Relato",
            PostType::Poesia => "Poesía",
        }
    }
}

impl Display for PostType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PostType::Relato => write!(f, "relato"),
            PostType::Poesia => write!(f, "poesia"),
        }
    }
}

impl FromStr for PostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "relato" => Ok(PostType::Relato),
            "poesia" => Ok(PostType::Poesia),
            other => Err(format!("Unknown post type: {}", other)),
        }
    }
}

/// Publication date as written in the document.
///
/// The raw string is kept so an unparseable date can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub struct PostDate {
    raw: String,
    parsed: Option<NaiveDate>,
}

impl PostDate {
    pub fn parsed(&self) -> Option<NaiveDate> {
        self.parsed
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn display(&self) -> String {
        match self.parsed {
            Some(ref date) => format_long_date(date),
            None => self.raw.clone(),
        }
    }

    /// Newest first; unparseable dates go last.
    pub fn cmp_desc(&self, other: &PostDate) -> Ordering {
        match (self.parsed, other.parsed) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl From<String> for PostDate {
    fn from(raw: String) -> Self {
        let parsed = parse_post_date(&raw);
        PostDate { raw, parsed }
    }
}

impl From<&str> for PostDate {
    fn from(raw: &str) -> Self {
        PostDate::from(raw.to_string())
    }
}

impl From<PostDate> for String {
    fn from(date: PostDate) -> Self {
        date.raw
    }
}

impl From<NaiveDate> for PostDate {
    fn from(date: NaiveDate) -> Self {
        PostDate { raw: date.format("%Y-%m-%d").to_string(), parsed: Some(date) }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Post {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: PostType,
    #[serde(default)]
    pub slug: String,
    pub date: PostDate,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl Post {
    /// Parses one post object, deriving the slug when the document has none.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Post> {
        let mut post: Post = serde_json::from_value(value)?;
        if post.slug.trim().is_empty() {
            post.slug = slugify(&post.title);
        }
        Ok(post)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Post> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, slug={}, type={}, date={}\ntitle={}",
               self.id,
               self.slug,
               self.kind,
               self.date.raw(),
               self.title,
        )
    }
}
