//! Declarative description of every protocol operation
//!
//! An [`OperationSpec`] is immutable, process-wide data: the catalog holds one
//! `static` entry per method and the builder and client only ever read it.

use serde::Serialize;

use crate::error::ModelError;
use crate::value::{ArgValue, Literal};

/// Expected type of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    String,
    Number,
    Boolean,
    /// A `(start, end)` pair of numbers
    Range,
}

impl ArgType {
    pub fn name(&self) -> &'static str {
        match self {
            ArgType::String => "string",
            ArgType::Number => "number",
            ArgType::Boolean => "boolean",
            ArgType::Range => "(number,number)",
        }
    }

    pub fn matches(&self, value: &ArgValue) -> bool {
        match (self, value) {
            (ArgType::String, ArgValue::String(_)) => true,
            (ArgType::Number, ArgValue::Number(n)) => n.is_finite(),
            (ArgType::Boolean, ArgValue::Bool(_)) => true,
            (ArgType::Range, ArgValue::List(items)) => {
                items.len() == 2 && items.iter().all(|item| matches!(item, ArgValue::Number(n) if n.is_finite()))
            }
            _ => false,
        }
    }
}

/// String transform applied after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringModifier {
    UpperCase,
    LowerCase,
}

impl StringModifier {
    pub fn apply(&self, s: &str) -> String {
        match self {
            StringModifier::UpperCase => s.to_uppercase(),
            StringModifier::LowerCase => s.to_lowercase(),
        }
    }
}

/// How one caller argument becomes a property value or sub-object id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArgRule {
    /// Zero-based position in the argument list
    pub position: usize,
    /// Human-readable name for log messages
    pub name: &'static str,
    /// Read this field of an object argument instead of the argument itself
    pub key: Option<&'static str>,
    pub expected: Option<ArgType>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Whitelist, checked after the modifier; empty means anything goes
    pub allowed: &'static [&'static str],
    pub default: Option<Literal>,
    /// Omit the property instead of failing when the value is unusable
    pub optional: bool,
    pub modifier: Option<StringModifier>,
}

impl ArgRule {
    pub const fn at(position: usize, name: &'static str) -> Self {
        Self {
            position,
            name,
            key: None,
            expected: None,
            min: None,
            max: None,
            allowed: &[],
            default: None,
            optional: false,
            modifier: None,
        }
    }

    pub const fn string(position: usize, name: &'static str) -> Self {
        Self::at(position, name).expect(ArgType::String)
    }

    pub const fn number(position: usize, name: &'static str) -> Self {
        Self::at(position, name).expect(ArgType::Number)
    }

    pub const fn boolean(position: usize, name: &'static str) -> Self {
        Self::at(position, name).expect(ArgType::Boolean)
    }

    pub const fn range(position: usize, name: &'static str) -> Self {
        Self::at(position, name).expect(ArgType::Range)
    }

    pub const fn expect(mut self, expected: ArgType) -> Self {
        self.expected = Some(expected);
        self
    }

    pub const fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    pub const fn or(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub const fn upper(mut self) -> Self {
        self.modifier = Some(StringModifier::UpperCase);
        self
    }

    fn validate(&self, method: &'static str) -> Result<(), ModelError> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ModelError::InvertedBounds { method, argument: self.name });
            }
        }
        if !self.allowed.is_empty() && self.expected != Some(ArgType::String) {
            return Err(ModelError::WhitelistOnNonString { method, argument: self.name });
        }
        if self.expected == Some(ArgType::Range) && (self.min.is_some() || self.max.is_some()) {
            return Err(ModelError::BoundedRange { method, argument: self.name });
        }
        Ok(())
    }
}

/// Value part of a property rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    /// Name only, as in `get studio.line#1 state, name`
    Bare,
    Fixed(Literal),
    Arg(ArgRule),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyRule {
    pub name: &'static str,
    pub value: PropertyValue,
}

impl PropertyRule {
    pub const fn bare(name: &'static str) -> Self {
        Self { name, value: PropertyValue::Bare }
    }

    pub const fn fixed(name: &'static str, value: Literal) -> Self {
        Self { name, value: PropertyValue::Fixed(value) }
    }

    pub const fn arg(name: &'static str, rule: ArgRule) -> Self {
        Self { name, value: PropertyValue::Arg(rule) }
    }
}

/// Sub-object id extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdRule {
    None,
    Fixed(&'static str),
    Arg(ArgRule),
}

/// What the far end answers with, and therefore how the reply is correlated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    /// Fire-and-forget
    None,
    /// An `indi` echoing the request's namespace, id and property names
    Correlated,
    /// The `ack cc logged=...` acknowledgment
    Login,
    /// An acknowledgment or event carrying the selected studio id
    SelectStudio,
    /// An acknowledgment or event carrying the selected show id
    SelectShow,
    Pong,
}

/// Far-end error families that can fail a pending call directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorChannel {
    Studio,
    Show,
    Line,
}

impl ErrorChannel {
    /// Classify an acknowledgment's status or message text
    pub fn classify(text: &str) -> Option<ErrorChannel> {
        let text = text.to_ascii_lowercase();
        if text.contains("studio with id") && text.contains("does not exist") {
            Some(ErrorChannel::Studio)
        } else if text.contains("show does not exist") {
            Some(ErrorChannel::Show)
        } else if text.contains("nonexisting line") {
            Some(ErrorChannel::Line)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorChannel::Studio => "studio",
            ErrorChannel::Show => "show",
            ErrorChannel::Line => "line",
        }
    }
}

/// Precondition on the cached state of the addressed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStateRule {
    Any,
    Is(&'static [&'static str]),
    Not(&'static [&'static str]),
}

impl LineStateRule {
    /// An unknown state never blocks
    pub fn permits(&self, state: Option<&str>) -> bool {
        match (self, state) {
            (LineStateRule::Any, _) | (_, None) => true,
            (LineStateRule::Is(states), Some(s)) => states.contains(&s),
            (LineStateRule::Not(states), Some(s)) => !states.contains(&s),
        }
    }
}

/// Reply post-processing: rename a property and optionally name list row fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    pub property: &'static str,
    pub rename: &'static str,
    pub each: &'static [&'static str],
}

/// Everything needed to build, gate and correlate one operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationSpec {
    pub method: &'static str,
    /// `object[.sub]`, e.g. `studio.line`
    pub namespace: &'static str,
    pub verb: &'static str,
    pub id: IdRule,
    pub props: &'static [PropertyRule],
    pub reply: ReplyKind,
    pub requires_login: bool,
    pub requires_studio: bool,
    pub error_channel: Option<ErrorChannel>,
    pub line_state: LineStateRule,
    pub expects: &'static [Expectation],
}

impl OperationSpec {
    /// A `get` with no properties that needs login and a selected studio
    pub const fn base(namespace: &'static str) -> Self {
        Self {
            method: "",
            namespace,
            verb: "get",
            id: IdRule::None,
            props: &[],
            reply: ReplyKind::None,
            requires_login: true,
            requires_studio: true,
            error_channel: None,
            line_state: LineStateRule::Any,
            expects: &[],
        }
    }

    pub fn object(&self) -> &'static str {
        match self.namespace.split_once('.') {
            Some((object, _)) => object,
            None => self.namespace,
        }
    }

    pub fn sub(&self) -> Option<&'static str> {
        self.namespace.split_once('.').map(|(_, sub)| sub)
    }

    pub fn expects_reply(&self) -> bool {
        self.reply != ReplyKind::None
    }

    /// Check the entry is well formed
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.method.is_empty() {
            return Err(ModelError::EmptyMethod);
        }
        let method = self.method;
        if self.namespace.is_empty() || self.namespace.split('.').any(str::is_empty) {
            return Err(ModelError::EmptyField { method, field: "namespace" });
        }
        if self.verb.is_empty() {
            return Err(ModelError::EmptyField { method, field: "verb" });
        }
        match self.id {
            IdRule::Fixed("") => return Err(ModelError::EmptyField { method, field: "id" }),
            IdRule::Arg(rule) => rule.validate(method)?,
            IdRule::Fixed(_) | IdRule::None => {}
        }
        for (index, prop) in self.props.iter().enumerate() {
            if prop.name.is_empty() {
                return Err(ModelError::UnnamedProperty { method, index });
            }
            if let PropertyValue::Arg(rule) = prop.value {
                rule.validate(method)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Studio with id 9 does not exist", Some(ErrorChannel::Studio))]
    #[case("SHOW DOES NOT EXIST", Some(ErrorChannel::Show))]
    #[case("Nonexisting line 12", Some(ErrorChannel::Line))]
    #[case("OK", None)]
    fn test_error_channel_classify(#[case] text: &str, #[case] expected: Option<ErrorChannel>) {
        assert_eq!(ErrorChannel::classify(text), expected);
    }

    #[test]
    fn test_line_state_rule() {
        let not_idle = LineStateRule::Not(&["IDLE"]);
        assert!(!not_idle.permits(Some("IDLE")));
        assert!(not_idle.permits(Some("ON_AIR")));
        assert!(not_idle.permits(None));

        let on_air = LineStateRule::Is(&["ON_AIR"]);
        assert!(on_air.permits(Some("ON_AIR")));
        assert!(!on_air.permits(Some("ON_AIR_LOCKED")));
    }

    #[test]
    fn test_range_matches_two_numbers() {
        let pair = ArgValue::List(vec![ArgValue::Number(1.0), ArgValue::Number(9.0)]);
        assert!(ArgType::Range.matches(&pair));
        assert!(!ArgType::Range.matches(&ArgValue::List(vec![ArgValue::Number(1.0)])));
        assert!(!ArgType::Number.matches(&ArgValue::Number(f64::NAN)));
    }

    #[test]
    fn test_namespace_split() {
        let spec = OperationSpec { method: "get_line", ..OperationSpec::base("studio.line") };
        assert_eq!(spec.object(), "studio");
        assert_eq!(spec.sub(), Some("line"));
        assert!(!spec.expects_reply());
    }

    #[test]
    fn test_validate_rejects_malformed_entries() {
        static INVERTED: &[PropertyRule] = &[PropertyRule::arg("id", ArgRule::number(0, "Id").min(5.0).max(1.0))];
        static WHITELIST: &[PropertyRule] = &[PropertyRule::arg("n", ArgRule::number(0, "N").one_of(&["A"]))];
        static UNNAMED: &[PropertyRule] = &[PropertyRule::bare("")];

        let base = OperationSpec { method: "probe", ..OperationSpec::base("studio") };
        assert_eq!(OperationSpec { method: "", ..base }.validate(), Err(ModelError::EmptyMethod));
        assert_eq!(
            OperationSpec { verb: "", ..base }.validate(),
            Err(ModelError::EmptyField { method: "probe", field: "verb" })
        );
        assert_eq!(
            OperationSpec { namespace: "studio.", ..base }.validate(),
            Err(ModelError::EmptyField { method: "probe", field: "namespace" })
        );
        assert_eq!(
            OperationSpec { props: INVERTED, ..base }.validate(),
            Err(ModelError::InvertedBounds { method: "probe", argument: "Id" })
        );
        assert_eq!(
            OperationSpec { props: WHITELIST, ..base }.validate(),
            Err(ModelError::WhitelistOnNonString { method: "probe", argument: "N" })
        );
        assert_eq!(
            OperationSpec { props: UNNAMED, ..base }.validate(),
            Err(ModelError::UnnamedProperty { method: "probe", index: 0 })
        );
        assert_eq!(base.validate(), Ok(()));
    }
}
