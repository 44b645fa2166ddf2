use serde_json::{Map, Value};

use crate::errors::{ParseError, SerializeError};
use crate::formats::{decode_text, FormatKind, ParsedDocument, Serialized};
use crate::segment::{Segment, SegmentModel};

// @module: Flat JSON string map adapter

const FORMAT: &str = "JSON";

/// Parse a JSON object into segments in document order.
///
/// Repeated keys keep the position of their first appearance and the value
/// of their last one.
pub fn parse(source: &[u8], target: Option<&[u8]>) -> Result<ParsedDocument, ParseError> {
    let source_map = parse_object(source)?;
    let target_map = match target {
        Some(bytes) => Some(parse_object(bytes)?),
        None => None,
    };

    let mut segments = Vec::with_capacity(source_map.len());
    for (key, value) in &source_map {
        let original = scalar_text(key, value)?;
        let translation = target_map
            .as_ref()
            .and_then(|map| map.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        segments.push(Segment::new(key.clone(), original, translation));
    }

    Ok(ParsedDocument {
        model: SegmentModel::from_segments(segments),
        envelope: None,
    })
}

/// Emit `{key: translation}` for every segment, two-space indented
pub fn serialize(model: &SegmentModel) -> Result<Serialized, SerializeError> {
    let mut map = Map::with_capacity(model.len());
    for segment in model.iter() {
        map.insert(segment.key.clone(), Value::String(segment.translation.clone()));
    }
    let bytes = serde_json::to_vec_pretty(&Value::Object(map))?;
    Ok(Serialized {
        bytes,
        warnings: Vec::new(),
    })
}

fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, ParseError> {
    let text = decode_text(bytes, FormatKind::KeyValue)?;
    let value: Value = serde_json::from_str(text).map_err(|e| ParseError::Malformed {
        format: FORMAT,
        reason: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ParseError::Malformed {
            format: FORMAT,
            reason: format!("expected a top-level object, found {}", json_type_name(&other)),
        }),
    }
}

fn scalar_text(key: &str, value: &Value) -> Result<String, ParseError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(ParseError::UnsupportedValue { key: key.to_string() }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
