//! Line scanner for the indented rule document.
//!
//! Supports the subset of YAML the rule document uses: nested mappings,
//! block sequences (`- item`), scalars and full-line `#` comments. Whether a
//! `key:` with no inline value opens a mapping or a sequence is decided by
//! peeking at the next content line.

use std::collections::BTreeMap;

use thiserror::Error;

/// Generic tree produced by [`parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Map(BTreeMap<String, Node>),
    Array(Vec<Node>),
}

impl Node {
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Convert into a `serde_json::Value` so typed structs can be deserialized from it.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            // Whole numbers become integers so they also fit integer fields.
            Node::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                Value::Number((*n as i64).into())
            }
            Node::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Node::String(s) => Value::String(s.clone()),
            Node::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, node)| (key.clone(), node.to_json()))
                    .collect(),
            ),
            Node::Array(items) => Value::Array(items.iter().map(Node::to_json).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number in the source document
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("sequence item `- ...` has no enclosing list")]
    SequenceOutsideArray,
    #[error("mapping entry `{0}` appears inside a list; list items must start with `- `")]
    EntryInsideArray(String),
    #[error("expected `key: value`, found `{0}`")]
    MissingColon(String),
    #[error("empty key")]
    EmptyKey,
}

struct Line<'a> {
    number: usize,
    indent: usize,
    text: &'a str,
}

enum Container {
    Map(BTreeMap<String, Node>),
    Array(Vec<Node>),
}

impl Container {
    fn into_node(self) -> Node {
        match self {
            Container::Map(map) => Node::Map(map),
            Container::Array(items) => Node::Array(items),
        }
    }
}

/// Where a finished frame goes once it is popped.
enum Slot {
    Root,
    Key(String),
    Item,
}

struct Frame {
    indent: isize,
    slot: Slot,
    container: Container,
}

/// Parse a rule document into a generic tree. The root is always a map.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    let lines = content_lines(text);
    let mut stack = vec![Frame {
        indent: -1,
        slot: Slot::Root,
        container: Container::Map(BTreeMap::new()),
    }];

    for (i, line) in lines.iter().enumerate() {
        let indent = line.indent as isize;
        while stack.len() > 1 && stack[stack.len() - 1].indent >= indent {
            pop_frame(&mut stack);
        }

        let next = lines.get(i + 1);
        if is_sequence_item(line.text) {
            parse_item(&mut stack, line, next)?;
        } else {
            parse_entry(&mut stack, line, next)?;
        }
    }

    while stack.len() > 1 {
        pop_frame(&mut stack);
    }
    match stack.pop() {
        Some(root) => Ok(root.container.into_node()),
        None => Ok(Node::Map(BTreeMap::new())),
    }
}

/// Non-blank, non-comment lines with their 1-based numbers and indentation.
fn content_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let indent = raw.chars().take_while(|c| c.is_whitespace()).count();
            Some(Line {
                number: i + 1,
                indent,
                text: trimmed,
            })
        })
        .collect()
}

fn is_sequence_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

/// `key: value` line inside a mapping.
fn parse_entry(stack: &mut Vec<Frame>, line: &Line<'_>, next: Option<&Line<'_>>) -> Result<(), ParseError> {
    let (key, value) = split_entry(line.text).ok_or_else(|| ParseError {
        line: line.number,
        kind: ParseErrorKind::MissingColon(line.text.to_string()),
    })?;
    if key.is_empty() {
        return Err(ParseError {
            line: line.number,
            kind: ParseErrorKind::EmptyKey,
        });
    }

    let Some(top) = stack.last_mut() else {
        return Ok(());
    };
    let Container::Map(map) = &mut top.container else {
        return Err(ParseError {
            line: line.number,
            kind: ParseErrorKind::EntryInsideArray(key),
        });
    };

    if !value.is_empty() {
        map.insert(key, scalar(value));
    } else {
        stack.push(Frame {
            indent: line.indent as isize,
            slot: Slot::Key(key),
            container: child_container(next, line.indent),
        });
    }
    Ok(())
}

/// `- ...` line inside a sequence.
fn parse_item(stack: &mut Vec<Frame>, line: &Line<'_>, next: Option<&Line<'_>>) -> Result<(), ParseError> {
    let Some(Frame {
        container: Container::Array(items),
        ..
    }) = stack.last_mut()
    else {
        return Err(ParseError {
            line: line.number,
            kind: ParseErrorKind::SequenceOutsideArray,
        });
    };

    let content = line.text[1..].trim_start();
    let item_indent = line.indent as isize;

    if content.is_empty() {
        stack.push(Frame {
            indent: item_indent,
            slot: Slot::Item,
            container: Container::Map(BTreeMap::new()),
        });
        return Ok(());
    }

    let entry = if is_quoted(content) { None } else { split_entry(content) };
    match entry {
        None => items.push(scalar(content)),
        Some((key, _)) if key.is_empty() => {
            return Err(ParseError {
                line: line.number,
                kind: ParseErrorKind::EmptyKey,
            });
        }
        Some((key, value)) if !value.is_empty() => {
            let mut map = BTreeMap::new();
            map.insert(key, scalar(value));
            stack.push(Frame {
                indent: item_indent,
                slot: Slot::Item,
                container: Container::Map(map),
            });
        }
        Some((key, _)) => {
            // `- key:` opens a container nested inside the new item map,
            // anchored at the column where the key starts.
            let key_indent = line.indent + (line.text.len() - content.len());
            stack.push(Frame {
                indent: item_indent,
                slot: Slot::Item,
                container: Container::Map(BTreeMap::new()),
            });
            stack.push(Frame {
                indent: key_indent as isize,
                slot: Slot::Key(key),
                container: child_container(next, key_indent),
            });
        }
    }
    Ok(())
}

/// Pick the container for a `key:` with no inline value: a list when the next
/// content line is more indented and starts a sequence item, a map otherwise.
fn child_container(next: Option<&Line<'_>>, indent: usize) -> Container {
    match next {
        Some(next) if next.indent > indent && is_sequence_item(next.text) => {
            Container::Array(Vec::new())
        }
        _ => Container::Map(BTreeMap::new()),
    }
}

/// Pop the top frame and attach its container to the new top.
fn pop_frame(stack: &mut Vec<Frame>) {
    let Some(frame) = stack.pop() else {
        return;
    };
    let Some(parent) = stack.last_mut() else {
        return;
    };
    let node = frame.container.into_node();
    match (&mut parent.container, frame.slot) {
        (Container::Map(map), Slot::Key(key)) => {
            map.insert(key, node);
        }
        (Container::Array(items), Slot::Item) => items.push(node),
        _ => unreachable!("frames are only pushed onto a parent of matching kind"),
    }
}

/// Split `key: value` on the first colon. Keys may be quoted.
fn split_entry(text: &str) -> Option<(String, &str)> {
    let (key, value) = text.split_once(':')?;
    Some((unquote(key.trim()).to_string(), value.trim()))
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
}

fn unquote(s: &str) -> &str {
    if is_quoted(s) {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Coerce an inline value: booleans, nulls, numbers, else a string.
fn scalar(raw: &str) -> Node {
    let raw = raw.trim();
    if is_quoted(raw) {
        return Node::String(unquote(raw).to_string());
    }
    match raw {
        "true" => return Node::Bool(true),
        "false" => return Node::Bool(false),
        "null" | "~" => return Node::Null,
        _ => {}
    }
    if looks_numeric(raw) {
        if let Ok(n) = raw.parse::<f64>() {
            if n.is_finite() {
                return Node::Number(n);
            }
        }
    }
    Node::String(raw.to_string())
}

// Rules out words f64::from_str accepts, like "inf" and "NaN".
fn looks_numeric(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
}
