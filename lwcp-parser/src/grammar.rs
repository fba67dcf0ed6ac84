//! nom grammar for one LWCP line
//!
//! ```text
//! line     := op [ ' ' target ] [ ' ' props ]
//! target   := ident ( '.' ident )* [ '#' id ]
//! props    := prop ( ',' prop )*
//! prop     := ident [ '=' value ]
//! value    := string | list | tuple | number | word
//! ```

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, take_while1},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    Finish, IResult,
};

use crate::error::{ParseError, ParseResult};
use crate::message::{InboundMessage, Op};
use crate::value::{Properties, Value};

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    let escapes = alt((
        value("\\", char('\\')),
        value("\"", char('"')),
        value("\n", char('n')),
        value("\r", char('r')),
        value("\t", char('t')),
    ));
    delimited(
        char('"'),
        map(opt(escaped_transform(is_not("\\\""), '\\', escapes)), Option::unwrap_or_default),
        char('"'),
    )(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = recognize(tuple((opt(char('-')), digit1, opt(pair(char('.'), digit1)))))(input)?;
    // "12ab" is a word, not a number followed by garbage
    if rest.starts_with(is_word_char) {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Digit)));
    }
    let parsed = if text.contains('.') {
        text.parse::<f64>().ok().map(Value::Float)
    } else {
        text.parse::<i64>()
            .ok()
            .map(Value::Int)
            .or_else(|| text.parse::<f64>().ok().map(Value::Float))
    };
    match parsed {
        Some(v) => Ok((rest, v)),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Float))),
    }
}

fn keyword(text: &str) -> Value {
    match text {
        "TRUE" => Value::Bool(true),
        "FALSE" => Value::Bool(false),
        "NULL" => Value::Null,
        other => Value::Enum(other.to_string()),
    }
}

fn element_separator(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

/// Deepest list/tuple nesting accepted in one value
pub const MAX_NESTING: usize = 32;

fn sequence(input: &str, open: char, close: char, depth: usize) -> IResult<&str, Vec<Value>> {
    let (rest, _) = pair(char(open), space0)(input)?;
    if depth >= MAX_NESTING {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    let (rest, items) = separated_list0(element_separator, |i| nested_value(i, depth + 1))(rest)?;
    let (rest, _) = pair(space0, char(close))(rest)?;
    Ok((rest, items))
}

fn nested_value(input: &str, depth: usize) -> IResult<&str, Value> {
    alt((
        map(quoted, Value::String),
        map(|i| sequence(i, '[', ']', depth), Value::List),
        map(|i| sequence(i, '(', ')', depth), Value::Tuple),
        number,
        map(word, keyword),
    ))(input)
}

fn prop_value(input: &str) -> IResult<&str, Value> {
    nested_value(input, 0)
}

fn property(input: &str) -> IResult<&str, (String, Value)> {
    let (input, name) = word(input)?;
    let (input, value) = opt(preceded(delimited(space0, char('='), space0), prop_value))(input)?;
    Ok((input, (name.to_string(), value.unwrap_or(Value::Null))))
}

fn properties(input: &str) -> IResult<&str, Properties> {
    map(separated_list1(element_separator, property), |pairs| pairs.into_iter().collect())(input)
}

fn namespace(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(char('.'), word))(input)
}

fn object_id(input: &str) -> IResult<&str, String> {
    preceded(char('#'), alt((quoted, map(word, str::to_string))))(input)
}

/// A target is only a namespace when it is not itself the first property
fn target(input: &str) -> IResult<&str, (&str, Option<String>)> {
    let (rest, parsed) = pair(namespace, opt(object_id))(input)?;
    if rest.trim_start().starts_with('=') || rest.trim_start().starts_with(',') {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Verify)));
    }
    Ok((rest, parsed))
}

fn message(input: &str) -> IResult<&str, InboundMessage> {
    let (input, op) = word(input)?;
    let (input, target) = opt(preceded(space1, target))(input)?;
    let (input, props) = opt(preceded(space1, properties))(input)?;
    let (input, _) = space0(input)?;

    let mut msg = InboundMessage::new(Op::from_word(op));
    if let Some((ns, id)) = target {
        msg = msg.with_namespace(ns);
        msg.id = id;
    }
    if let Some(props) = props {
        msg.props = props;
    }
    Ok((input, msg))
}

/// Parse one line, reporting why it failed
pub fn parse_message(line: &str) -> ParseResult<InboundMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    all_consuming(message)(trimmed)
        .finish()
        .map(|(_, msg)| msg)
        .map_err(|e| ParseError::Syntax {
            line: trimmed.to_string(),
            remainder: e.input.to_string(),
        })
}

/// Parse one line; unparseable input yields `None`
pub fn parse_line(line: &str) -> Option<InboundMessage> {
    parse_message(line).ok()
}
