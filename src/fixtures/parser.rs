use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::error::FixtureError;

/// Turns the raw contents of a fixture file into a JSON-shaped value.
pub trait FixtureParser: Send + Sync {
    /// Parse one fixture file.
    ///
    /// # Errors
    /// Returns `FixtureError` when the contents are not valid for this format.
    fn parse(&self, contents: &str) -> Result<Value, FixtureError>;
}

impl<F> FixtureParser for F
where
    F: Fn(&str) -> Result<Value, FixtureError> + Send + Sync,
{
    fn parse(&self, contents: &str) -> Result<Value, FixtureError> {
        self(contents)
    }
}

/// Fixture file formats with a built-in parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum FixtureFormat {
    Json,
    Xml,
}

impl FixtureFormat {
    #[must_use]
    pub fn file_ending(self) -> &'static str {
        match self {
            FixtureFormat::Json => ".json",
            FixtureFormat::Xml => ".xml",
        }
    }

    #[must_use]
    pub fn parser(self) -> Box<dyn FixtureParser> {
        match self {
            FixtureFormat::Json => Box::new(JsonParser),
            FixtureFormat::Xml => Box::new(XmlParser),
        }
    }
}

/// JSON fixtures: the document is used as-is; an empty document is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl FixtureParser for JsonParser {
    fn parse(&self, contents: &str) -> Result<Value, FixtureError> {
        let fixtures: Value =
            serde_json::from_str(contents).map_err(|_| FixtureError::InvalidJson)?;
        if is_empty_fixture(&fixtures) {
            return Err(FixtureError::InvalidJson);
        }
        Ok(fixtures)
    }
}

/// XML fixtures, converted to the map shape a JSON encoding of the tree would have.
///
/// The root element is dropped; child elements become keys, repeated siblings become
/// arrays, text-only elements become strings, empty elements become `{}` and
/// attributes land under `"@attributes"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

impl FixtureParser for XmlParser {
    fn parse(&self, contents: &str) -> Result<Value, FixtureError> {
        let doc = roxmltree::Document::parse(contents).map_err(|_| FixtureError::InvalidXml)?;
        Ok(element_to_value(doc.root_element()))
    }
}

fn element_to_value(node: roxmltree::Node<'_, '_>) -> Value {
    let mut map = Map::new();

    let attributes: Map<String, Value> = node
        .attributes()
        .map(|attr| (attr.name().to_string(), Value::String(attr.value().to_string())))
        .collect();
    let has_attributes = !attributes.is_empty();
    if has_attributes {
        map.insert("@attributes".to_string(), Value::Object(attributes));
    }

    let mut has_children = false;
    for child in node.children().filter(roxmltree::Node::is_element) {
        has_children = true;
        let name = child.tag_name().name().to_string();
        let value = element_to_value(child);
        match map.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }

    if !has_children {
        let text: String = node
            .children()
            .filter(roxmltree::Node::is_text)
            .filter_map(|n| n.text())
            .collect();
        if !text.trim().is_empty() {
            if !has_attributes {
                return Value::String(text);
            }
            map.insert("0".to_string(), Value::String(text));
        }
    }

    Value::Object(map)
}

/// Values that count as "nothing loaded": null, false, 0, "", "0", `[]` and `{}`.
pub(crate) fn is_empty_fixture(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
