//! Structured form of one inbound protocol line

use serde::Serialize;

use crate::value::{Properties, Value};

/// Operation word that opens every inbound line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Indication: the answer to a `get`
    Indi,
    /// Acknowledgment of a command such as `login` or `select`
    Ack,
    /// Unsolicited state change
    Event,
    /// Unsolicited state refresh
    Update,
    /// Answer to `ping`
    Pong,
    /// Any other operation word, lower-cased
    Other(String),
}

impl Op {
    pub fn from_word(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "indi" => Op::Indi,
            "ack" => Op::Ack,
            "event" => Op::Event,
            "update" => Op::Update,
            "pong" => Op::Pong,
            other => Op::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Op::Indi => "indi",
            Op::Ack => "ack",
            Op::Event => "event",
            Op::Update => "update",
            Op::Pong => "pong",
            Op::Other(word) => word,
        }
    }
}

/// One parsed inbound line
///
/// Produced once per line, consumed once by dispatch, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InboundMessage {
    pub op: Op,
    /// Top-level object, e.g. `studio` in `studio.line#3`
    pub object: Option<String>,
    /// Sub-object path, e.g. `line` in `studio.line#3`
    pub sub: Option<String>,
    /// Sub-object id, e.g. `3` in `studio.line#3`
    pub id: Option<String>,
    pub props: Properties,
}

impl InboundMessage {
    pub fn new(op: Op) -> Self {
        Self {
            op,
            object: None,
            sub: None,
            id: None,
            props: Properties::new(),
        }
    }

    /// Split a dotted namespace into object and sub-object
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        match namespace.split_once('.') {
            Some((object, sub)) => {
                self.object = Some(object.to_string());
                self.sub = Some(sub.to_string());
            }
            None => {
                self.object = Some(namespace.to_string());
                self.sub = None;
            }
        }
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: Value) -> Self {
        self.props.insert(name, value);
        self
    }

    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    pub fn sub(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// True when the message addresses `object` with exactly the given sub-object
    pub fn addresses(&self, object: &str, sub: Option<&str>) -> bool {
        self.object() == Some(object) && self.sub() == sub
    }
}

/// Collaborator that turns one line of text into a message
///
/// Implementations must be pure and must not panic; an unparseable line is
/// reported as `None` and silently dropped by the caller.
pub trait LineParser: Send + Sync {
    fn parse_line(&self, line: &str) -> Option<InboundMessage>;
}

/// The default LWCP grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct LwcpParser;

impl LineParser for LwcpParser {
    fn parse_line(&self, line: &str) -> Option<InboundMessage> {
        crate::grammar::parse_message(line).ok()
    }
}
