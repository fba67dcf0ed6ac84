//! Turn an [`OperationSpec`] and caller arguments into a wire request
//!
//! Each id and property rule is evaluated in declaration order. A rule whose
//! argument is missing, mistyped, out of bounds or not whitelisted falls back
//! to its default, is omitted when optional, and otherwise aborts the request
//! so nothing is sent.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{BuildError, ValidationError};
use crate::model::{ArgRule, ArgType, IdRule, OperationSpec, PropertyValue};
use crate::value::{format_number, stringify, ArgValue};

/// One property of an outbound request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestProperty {
    pub name: &'static str,
    /// Rendered token; `None` for a bare property name
    pub value: Option<String>,
}

/// A validated outbound request, ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    pub verb: &'static str,
    pub namespace: &'static str,
    pub id: Option<String>,
    pub props: Vec<RequestProperty>,
}

impl Request {
    pub fn object(&self) -> &'static str {
        match self.namespace.split_once('.') {
            Some((object, _)) => object,
            None => self.namespace,
        }
    }

    pub fn sub(&self) -> Option<&'static str> {
        self.namespace.split_once('.').map(|(_, sub)| sub)
    }

    /// Property names in request order
    pub fn property_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.props.iter().map(|p| p.name)
    }

    /// The frame text without the trailing newline
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.namespace)?;
        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }
        for (index, prop) in self.props.iter().enumerate() {
            f.write_str(if index == 0 { " " } else { ", " })?;
            f.write_str(prop.name)?;
            if let Some(value) = &prop.value {
                write!(f, "={}", value)?;
            }
        }
        Ok(())
    }
}

/// Build the request for `spec` from positional arguments
///
/// `args[n]` is `None` when the caller did not supply argument `n`.
pub fn build_request(spec: &OperationSpec, args: &[Option<ArgValue>]) -> Result<Request, BuildError> {
    spec.validate()?;

    let id = match spec.id {
        IdRule::None => None,
        IdRule::Fixed(id) => Some(id.to_string()),
        // The id is optional at the top level; without it the namespace itself is addressed
        IdRule::Arg(rule) => match resolve_argument(spec.method, &rule, args) {
            Ok(token) => token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("{}; addressing {} without a sub-object id", e, spec.namespace);
                None
            }
        },
    };

    let mut props = Vec::with_capacity(spec.props.len());
    for prop in spec.props {
        let value = match prop.value {
            PropertyValue::Bare => None,
            PropertyValue::Fixed(literal) => Some(stringify(&literal.into())),
            PropertyValue::Arg(rule) => match resolve_argument(spec.method, &rule, args)? {
                Some(token) => Some(token),
                None => continue,
            },
        };
        props.push(RequestProperty { name: prop.name, value });
    }

    Ok(Request { verb: spec.verb, namespace: spec.namespace, id, props })
}

/// Resolve one argument to its rendered token
///
/// `Ok(None)` means the rule is optional and the property is omitted.
pub fn resolve_argument(
    method: &'static str,
    rule: &ArgRule,
    args: &[Option<ArgValue>],
) -> Result<Option<String>, ValidationError> {
    let position = rule.position;
    let raw = args.get(position).and_then(Option::as_ref);
    let raw = match rule.key {
        Some(key) => raw.and_then(|arg| arg.get(key)),
        None => raw,
    };

    let Some(raw) = raw else {
        return fallback(
            rule,
            ValidationError::MissingArgument { method, argument: rule.name, position },
        );
    };

    if let Some(expected) = rule.expected {
        if !expected.matches(raw) {
            return fallback(
                rule,
                ValidationError::TypeMismatch {
                    method,
                    argument: rule.name,
                    position,
                    expected: expected.name(),
                    actual: raw.type_name(),
                },
            );
        }
    }

    if let ArgValue::Number(value) = raw {
        let value = *value;
        if let Some(min) = rule.min.filter(|min| value < *min) {
            return fallback(
                rule,
                ValidationError::BelowMinimum { method, argument: rule.name, position, min, value },
            );
        }
        if let Some(max) = rule.max.filter(|max| value > *max) {
            return fallback(
                rule,
                ValidationError::AboveMaximum { method, argument: rule.name, position, max, value },
            );
        }
    }

    let value = match (rule.modifier, raw) {
        (Some(modifier), ArgValue::String(s)) => ArgValue::String(modifier.apply(s)),
        _ => raw.clone(),
    };

    if !rule.allowed.is_empty() {
        let permitted = value.as_str().map_or(false, |s| rule.allowed.contains(&s));
        if !permitted {
            return fallback(
                rule,
                ValidationError::NotAllowed {
                    method,
                    argument: rule.name,
                    position,
                    value: stringify(&value),
                    allowed: rule.allowed,
                },
            );
        }
    }

    let token = render(rule.expected, &value);
    if token.is_empty() {
        return fallback(rule, ValidationError::Unserializable { method, argument: rule.name, position });
    }
    Ok(Some(token))
}

fn render(expected: Option<ArgType>, value: &ArgValue) -> String {
    match (expected, value) {
        (Some(ArgType::Range), ArgValue::List(bounds)) => {
            let parts: Vec<String> = bounds.iter().filter_map(ArgValue::as_f64).map(format_number).collect();
            format!("({})", parts.join(", "))
        }
        _ => stringify(value),
    }
}

fn fallback(rule: &ArgRule, error: ValidationError) -> Result<Option<String>, ValidationError> {
    if let Some(default) = rule.default {
        let token = stringify(&default.into());
        warn!("{}; using the default {}", error, token);
        return Ok(Some(token));
    }
    if rule.optional {
        if !error.is_missing() {
            debug!("{}; omitting the optional property", error);
        }
        return Ok(None);
    }
    Err(error)
}
