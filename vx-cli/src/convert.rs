//! JSON on the command line in, JSON on stdout out

use anyhow::{Context, Result};
use serde_json::Value as Json;
use vx_client::{ArgValue, Properties, Reply};

/// Convert one parsed JSON value into an operation argument
///
/// `null` stands for an omitted positional argument.
pub fn json_to_arg(json: Json) -> Option<ArgValue> {
    match json {
        Json::Null => None,
        Json::Bool(b) => Some(ArgValue::Bool(b)),
        Json::Number(n) => n.as_f64().map(ArgValue::Number),
        Json::String(s) => Some(ArgValue::String(s)),
        Json::Array(items) => Some(ArgValue::List(
            items.into_iter().map(|item| json_to_arg(item).unwrap_or(ArgValue::Null)).collect(),
        )),
        Json::Object(fields) => Some(ArgValue::object(
            fields.into_iter().map(|(key, value)| (key, json_to_arg(value))),
        )),
    }
}

/// Parse a command-line word as JSON; anything that is not JSON is a string
pub fn parse_arg(word: &str) -> Option<ArgValue> {
    match serde_json::from_str::<Json>(word) {
        Ok(json) => json_to_arg(json),
        Err(_) => Some(ArgValue::String(word.to_string())),
    }
}

pub fn parse_args(words: &[String]) -> Vec<Option<ArgValue>> {
    words.iter().map(|word| parse_arg(word)).collect()
}

/// JSON document printed for a completed call
pub fn reply_to_json(method: &str, reply: &Reply) -> Result<Json> {
    let json = match reply.props() {
        Some(props) => props_to_json(props)?,
        None => serde_json::json!({ "sent": method }),
    };
    Ok(json)
}

pub fn props_to_json(props: &Properties) -> Result<Json> {
    serde_json::to_value(props).context("Failed to serialize reply properties")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vx_client::Value;

    #[rstest]
    #[case("true", Some(ArgValue::Bool(true)))]
    #[case("42", Some(ArgValue::Number(42.0)))]
    #[case("-1.5", Some(ArgValue::Number(-1.5)))]
    #[case("\"5550100\"", Some(ArgValue::String("5550100".into())))]
    #[case("TALENT", Some(ArgValue::String("TALENT".into())))]
    #[case("null", None)]
    fn test_parse_arg(#[case] word: &str, #[case] expected: Option<ArgValue>) {
        assert_eq!(parse_arg(word), expected);
    }

    #[test]
    fn test_object_skips_nulls() {
        let arg = parse_arg(r#"{"handset": true, "hybrid": null, "port": 2}"#).unwrap();
        assert_eq!(arg.get("handset"), Some(&ArgValue::Bool(true)));
        assert_eq!(arg.get("hybrid"), None);
        assert_eq!(arg.get("port").and_then(ArgValue::as_f64), Some(2.0));
    }

    #[test]
    fn test_list_keeps_positions() {
        let arg = parse_arg("[10, null, 20]").unwrap();
        assert_eq!(
            arg,
            ArgValue::List(vec![ArgValue::Number(10.0), ArgValue::Null, ArgValue::Number(20.0)])
        );
    }

    #[test]
    fn test_reply_json() {
        let mut props = Properties::new();
        props.insert("state", Value::Enum("IDLE".into()));
        props.insert("name", Value::Null);
        let json = reply_to_json("get_line", &Reply::Props(props)).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "IDLE", "name": null }));

        let json = reply_to_json("drop_line", &Reply::Sent).unwrap();
        assert_eq!(json, serde_json::json!({ "sent": "drop_line" }));
    }
}
