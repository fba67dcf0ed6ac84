//! Typed wrappers, one per catalog operation
//!
//! Each wrapper converts its arguments into positional [`ArgValue`]s and runs
//! the generic [`Client::call`] against the matching static entry, so the
//! wrapper list and the catalog cannot drift apart.

use lwcp_parser::{Properties, Value};
use paste::paste;
use vx_api::catalog::{book, cc, line, log, studio};
use vx_api::{args, ArgValue, IntoArg};

use crate::client::{Client, Reply};
use crate::error::Result;

/// Conversion of a [`Reply`] into a wrapper's return type
pub trait FromReply: Sized {
    fn from_reply(reply: Reply) -> Self;
}

impl FromReply for Properties {
    fn from_reply(reply: Reply) -> Self {
        reply.into_props()
    }
}

impl FromReply for () {
    fn from_reply(_: Reply) -> Self {}
}

/// Options of [`Client::call_line`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CallOptions {
    pub handset: Option<bool>,
    pub hybrid: Option<u32>,
    pub port: Option<u32>,
}

impl IntoArg for CallOptions {
    fn into_arg(self) -> Option<ArgValue> {
        Some(ArgValue::object([
            ("handset", self.handset.into_arg()),
            ("hybrid", self.hybrid.into_arg()),
            ("port", self.port.into_arg()),
        ]))
    }
}

/// Options of [`Client::take_line`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TakeOptions {
    pub handset: Option<bool>,
    pub hybrid: Option<u32>,
}

impl IntoArg for TakeOptions {
    fn into_arg(self) -> Option<ArgValue> {
        Some(ArgValue::object([("handset", self.handset.into_arg()), ("hybrid", self.hybrid.into_arg())]))
    }
}

/// Phone book fields for [`Client::add_record`] and [`Client::update_record`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFields {
    /// `GLOBAL`, `STUDIO` or `SHOW`, any case
    pub kind: Option<String>,
    pub name: Option<String>,
    pub number: Option<String>,
}

impl IntoArg for RecordFields {
    fn into_arg(self) -> Option<ArgValue> {
        Some(ArgValue::object([
            ("type", self.kind.into_arg()),
            ("name", self.name.into_arg()),
            ("number", self.number.into_arg()),
        ]))
    }
}

macro_rules! operations {
    ($(
        $(#[$doc:meta])*
        $ns:ident::$name:ident($($arg:ident: $ty:ty),*) -> $ret:ty;
    )*) => {
        paste! {
            impl Client {
                $(
                    $(#[$doc])*
                    pub async fn $name(&self, $($arg: $ty),*) -> Result<$ret> {
                        let reply = self.call(&$ns::[<$name:upper>], &args![$($arg),*]).await?;
                        Ok(<$ret as FromReply>::from_reply(reply))
                    }
                )*
            }
        }
    };
}

operations! {
    /// List of studios as `(id, name)` tuples
    cc::studio_list() -> Properties;
    cc::date() -> Properties;
    /// Server identity; needs no login
    cc::get_server() -> Properties;
    /// `TALENT` or `PRODUCER`; anything else falls back to `TALENT`
    cc::set_mode(mode: &str) -> ();
    /// Round trip through the server
    cc::ping() -> ();

    studio::get_studio() -> Properties;
    studio::show_list() -> Properties;
    studio::line_list() -> Properties;
    studio::hybrid_list() -> Properties;
    /// Fails with [`ClientError::Rejected`](crate::ClientError::Rejected) for an unknown studio
    studio::select_studio(studio_id: u32) -> Properties;
    studio::select_show(show_id: u32) -> Properties;
    /// Send an instant message to the studio
    studio::im(from: &str, message: &str) -> ();
    studio::set_busy_all(state: bool) -> ();
    studio::drop_hybrid(hybrid: u32) -> ();
    studio::hold_hybrid(hybrid: u32) -> ();

    line::get_line(line: u32) -> Properties;
    line::get_caller_id(line: u32) -> Properties;
    /// Refused while the line is known to be `IDLE`
    line::set_line_comment(line: u32, comment: &str) -> ();
    /// Refused while the line is known to be `IDLE`
    line::set_caller_id(line: u32, caller_id: &str) -> ();
    line::seize_line(line: u32) -> ();
    line::call_line(line: u32, number: &str, options: CallOptions) -> ();
    line::take_line(line: u32, options: TakeOptions) -> ();
    /// Take the next line in the queue
    line::take_next() -> ();
    line::drop_line(line: u32) -> ();
    /// Requires the line to be `ON_AIR`
    line::lock_line(line: u32) -> ();
    /// Requires the line to be `ON_AIR_LOCKED`
    line::unlock_line(line: u32) -> ();
    line::hold_line(line: u32, ready: bool) -> ();
    line::raise_line(line: u32) -> ();

    book::record_count() -> Properties;
    book::record_list(range: Option<(u32, u32)>) -> Properties;
    book::add_record(record: RecordFields) -> ();
    book::update_record(record_id: u32, record: RecordFields) -> ();
    book::delete_record(record_id: u32) -> ();

    /// Reply exposes `logCount`
    log::log_count() -> Properties;
    /// Reply exposes `logList`, one record per call
    log::log_list(range: Option<(u32, u32)>) -> Properties;
}

impl Client {
    /// Authenticate; resolves to the server's `logged` flag
    pub async fn login(&self, username: &str, password: &str) -> Result<bool> {
        let reply = self.call(&cc::LOGIN, &args![username, password]).await?;
        Ok(reply
            .props()
            .and_then(|props| props.get("logged"))
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_options_skip_unset_fields() {
        let options = CallOptions { hybrid: Some(2), ..Default::default() };
        let arg = options.into_arg().unwrap();
        assert_eq!(arg.get("hybrid"), Some(&ArgValue::Number(2.0)));
        assert_eq!(arg.get("handset"), None);
    }

    #[test]
    fn test_record_fields_use_wire_names() {
        let record = RecordFields { kind: Some("show".into()), ..Default::default() };
        let arg = record.into_arg().unwrap();
        assert_eq!(arg.get("type"), Some(&ArgValue::String("show".into())));
    }

    #[test]
    fn test_from_reply() {
        assert!(Properties::from_reply(Reply::Sent).is_empty());
        <() as FromReply>::from_reply(Reply::Sent);
    }
}
