//! Unsolicited notifications broadcast to subscribers

use lwcp_parser::Properties;
use serde::Serialize;
use vx_api::ErrorChannel;

/// One notification on the [`Client::subscribe`](crate::Client::subscribe) channel
///
/// Events are emitted whether or not a call was waiting for the same message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    Pong,
    LoggedIn { logged: bool },
    StudioSelected { studio_id: i64 },
    ShowSelected { show_id: i64 },
    StudioChanged { props: Properties },
    LineChanged { line: String, props: Properties },
    BookChanged { book: Option<String>, props: Properties },
    ShowChanged { props: Properties },
    InstantMessage { from: Option<String>, message: Option<String> },
    /// An acknowledgment matched a known error pattern
    Rejected { channel: ErrorChannel, message: String },
    /// The socket failed; the connection is being torn down
    SocketError { message: String },
    Disconnected,
}
