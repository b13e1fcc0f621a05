//! XML-RPC encoding and decoding.
//!
//! Values are carried as `serde_json::Value` on both sides of the wire:
//!
//! | JSON            | XML-RPC                                   |
//! |-----------------|-------------------------------------------|
//! | `null`          | `<nil/>`                                  |
//! | bool            | `<boolean>`                               |
//! | integer         | `<int>` (`<i8>` outside the i32 range)    |
//! | float           | `<double>`                                |
//! | string          | `<string>`                                |
//! | array           | `<array><data>..</data></array>`          |
//! | object          | `<struct><member>..</member></struct>`    |
//!
//! `dateTime.iso8601` and `base64` values decode to plain strings.

use crate::error::{OdooError, OdooResult};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Number, Value};

/// Encode a `methodCall` document.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("<?xml version=\"1.0\"?><methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        encode_value(&mut out, param);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn encode_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Null => out.push_str("<nil/>"),
        Value::Bool(b) => {
            out.push_str("<boolean>");
            out.push(if *b { '1' } else { '0' });
            out.push_str("</boolean>");
        }
        Value::Number(n) => encode_number(out, n),
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Object(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                encode_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
}

fn encode_number(out: &mut String, n: &Number) {
    if let Some(i) = n.as_i64() {
        if i32::try_from(i).is_ok() {
            out.push_str(&format!("<int>{i}</int>"));
        } else {
            out.push_str(&format!("<i8>{i}</i8>"));
        }
    } else if let Some(f) = n.as_f64() {
        out.push_str(&format!("<double>{f}</double>"));
    }
}

/// Decode a `methodResponse` document.
///
/// Faults are returned as [`OdooError::Fault`].
pub fn decode_response(body: &str) -> OdooResult<Value> {
    let root = parse_document(body)?;
    if root.name != "methodResponse" {
        return Err(malformed(format!("unexpected root element <{}>", root.name)));
    }

    if let Some(fault) = root.child("fault") {
        let value = fault
            .child("value")
            .ok_or_else(|| malformed("fault without value"))?;
        return Err(fault_from_value(decode_value(value)?));
    }

    let params = root
        .child("params")
        .ok_or_else(|| malformed("response without params"))?;
    match params.child("param").and_then(|p| p.child("value")) {
        Some(value) => decode_value(value),
        None => Ok(Value::Null),
    }
}

fn fault_from_value(value: Value) -> OdooError {
    let code = match value.get("faultCode") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    };
    let message = value
        .get("faultString")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| value.to_string());
    OdooError::Fault { code, message }
}

fn decode_value(value: &Element) -> OdooResult<Value> {
    let Some(typed) = value.elements().next() else {
        // Untyped values are strings.
        return Ok(Value::String(value.text()));
    };

    match typed.name.as_str() {
        "int" | "i4" | "i8" => {
            let text = typed.text();
            let i: i64 = text
                .trim()
                .parse()
                .map_err(|_| malformed(format!("invalid integer '{}'", text.trim())))?;
            Ok(Value::from(i))
        }
        "boolean" => match typed.text().trim() {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            other => Err(malformed(format!("invalid boolean '{other}'"))),
        },
        "double" => {
            let text = typed.text();
            let f: f64 = text
                .trim()
                .parse()
                .map_err(|_| malformed(format!("invalid double '{}'", text.trim())))?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| malformed(format!("non-finite double '{}'", text.trim())))
        }
        "string" => Ok(Value::String(typed.text())),
        "nil" => Ok(Value::Null),
        "dateTime.iso8601" | "base64" => Ok(Value::String(typed.text().trim().to_string())),
        "array" => {
            let Some(data) = typed.child("data") else {
                return Ok(Value::Array(Vec::new()));
            };
            data.elements()
                .filter(|e| e.name == "value")
                .map(decode_value)
                .collect::<OdooResult<Vec<_>>>()
                .map(Value::Array)
        }
        "struct" => {
            let mut members = Map::new();
            for member in typed.elements().filter(|e| e.name == "member") {
                let name = member
                    .child("name")
                    .ok_or_else(|| malformed("struct member without name"))?
                    .text();
                let value = match member.child("value") {
                    Some(v) => decode_value(v)?,
                    None => Value::Null,
                };
                members.insert(name, value);
            }
            Ok(Value::Object(members))
        }
        other => Err(malformed(format!("unsupported value type <{other}>"))),
    }
}

fn malformed(message: impl Into<String>) -> OdooError {
    OdooError::Malformed(message.into())
}

#[derive(Debug)]
struct Element {
    name: String,
    children: Vec<Node>,
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    fn new(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            children: Vec::new(),
        }
    }

    fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Parse the document into a small element tree.
fn parse_document(xml: &str) -> OdooResult<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event().map_err(|e| malformed(e.to_string()))? {
            Event::Start(start) => stack.push(Element::new(start.name().as_ref())),
            Event::Empty(empty) => {
                let element = Element::new(empty.name().as_ref());
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => return Ok(element),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("unbalanced closing tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => return Ok(element),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| malformed(e.to_string()))?;
                    current.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    current.children.push(Node::Text(text));
                }
            }
            Event::Eof => return Err(malformed("unexpected end of document")),
            _ => {}
        }
    }
}
