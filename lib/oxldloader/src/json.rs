use crate::loader::DocumentParser;
use json_event_parser::{JsonEvent, JsonSyntaxError, SliceJsonParser};
use std::collections::HashMap;
use std::error::Error;

/// An in-memory JSON value.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum JsonNode {
    String(String),
    Number(String),
    Boolean(bool),
    Null,
    Array(Vec<JsonNode>),
    Object(HashMap<String, JsonNode>),
}

/// Default [`DocumentParser`] building a [`JsonNode`] tree out of the
/// response body.
///
/// JSON-LD processors that stream or use their own document model can
/// substitute any other [`DocumentParser`] implementation.
#[derive(Default, Clone, Copy)]
pub struct JsonNodeParser;

impl DocumentParser for JsonNodeParser {
    type Document = JsonNode;

    fn parse(&self, body: &[u8], _url: &str) -> Result<JsonNode, Box<dyn Error + Send + Sync>> {
        Ok(json_slice_to_node(body)?)
    }
}

enum Frame {
    Array(Vec<JsonNode>),
    Object(HashMap<String, JsonNode>, Option<String>),
}

fn json_slice_to_node(data: &[u8]) -> Result<JsonNode, JsonSyntaxError> {
    let mut parser = SliceJsonParser::new(data);
    let mut stack = Vec::new();
    loop {
        let node = match parser.parse_next()? {
            JsonEvent::String(value) => JsonNode::String(value.into()),
            JsonEvent::Number(value) => JsonNode::Number(value.into()),
            JsonEvent::Boolean(value) => JsonNode::Boolean(value),
            JsonEvent::Null => JsonNode::Null,
            JsonEvent::StartArray => {
                stack.push(Frame::Array(Vec::new()));
                continue;
            }
            JsonEvent::StartObject => {
                stack.push(Frame::Object(HashMap::new(), None));
                continue;
            }
            JsonEvent::ObjectKey(key) => {
                if let Some(Frame::Object(_, pending_key)) = stack.last_mut() {
                    *pending_key = Some(key.into());
                }
                continue;
            }
            JsonEvent::EndArray => match stack.pop() {
                Some(Frame::Array(items)) => JsonNode::Array(items),
                _ => unreachable!("the JSON parser emits balanced arrays"),
            },
            JsonEvent::EndObject => match stack.pop() {
                Some(Frame::Object(entries, _)) => JsonNode::Object(entries),
                _ => unreachable!("the JSON parser emits balanced objects"),
            },
            JsonEvent::Eof => unreachable!("a full value is read before the end of file"),
        };
        match stack.last_mut() {
            Some(Frame::Array(items)) => items.push(node),
            Some(Frame::Object(entries, pending_key)) => {
                if let Some(key) = pending_key.take() {
                    entries.insert(key, node);
                }
            }
            None => return Ok(node),
        }
    }
}
