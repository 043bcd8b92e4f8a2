use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod markdown;
pub mod renderer;

/// Body of a post.
///
/// The JSON documents carry no discriminant: a string is plain text, an array
/// is a paragraph sequence whose items are strings or arrays of verse lines.
/// The shape is resolved once, when the post is ingested.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub enum Content {
    Plain(String),
    Paragraphs(Vec<Item>),
    /// Any other JSON shape, kept as its string conversion.
    Literal(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text(String),
    Stanza(Vec<String>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Plain(String::new())
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(lines) => Item::Stanza(lines.iter().map(value_to_text).collect()),
            Value::String(text) => Item::Text(text),
            other => Item::Text(value_to_text(&other)),
        }
    }
}

impl From<Value> for Content {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Content::Plain(text),
            Value::Array(items) => Content::Paragraphs(items.into_iter().map(Item::from).collect()),
            other => Content::Literal(value_to_text(&other)),
        }
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        match item {
            Item::Text(text) => Value::String(text),
            Item::Stanza(lines) => Value::Array(lines.into_iter().map(Value::String).collect()),
        }
    }
}

impl From<Content> for Value {
    fn from(content: Content) -> Self {
        match content {
            Content::Plain(text) | Content::Literal(text) => Value::String(text),
            Content::Paragraphs(items) => Value::Array(items.into_iter().map(Value::from).collect()),
        }
    }
}
