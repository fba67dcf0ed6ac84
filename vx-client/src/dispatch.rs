//! Routing of parsed inbound messages
//!
//! [`dispatch`] is the only place session flags change in response to the
//! far end. It resolves waiters and returns the events to broadcast.

use lwcp_parser::{InboundMessage, Op, Properties, Value};
use tracing::{debug, error, warn};
use vx_api::ErrorChannel;

use crate::correlation::{Correlator, WaiterKey};
use crate::event::ClientEvent;
use crate::session::Session;

/// Properties that may carry the far end's status or error text
const STATUS_PROPS: &[&str] = &["status", "message", "msg", "error", "reason"];

/// State guarded together: the session and the waiter table
#[derive(Debug, Default)]
pub struct Core {
    pub session: Session,
    pub correlator: Correlator,
}

/// Apply one inbound message and collect the events it produces
pub fn dispatch(core: &mut Core, msg: InboundMessage) -> Vec<ClientEvent> {
    let mut events = Vec::new();

    if let Some((channel, message)) = rejection(&msg) {
        error!("The server rejected a request: {}", message);
        if !core.correlator.fail(channel, &message) {
            debug!("No pending {} request for the rejection", channel.as_str());
        }
        events.push(ClientEvent::Rejected { channel, message });
        return events;
    }

    match msg.op.clone() {
        Op::Pong => {
            core.correlator.resolve(&WaiterKey::Pong, msg.props);
            events.push(ClientEvent::Pong);
        }
        Op::Indi => on_indication(core, msg),
        Op::Ack if msg.addresses("cc", None) => on_login(core, msg, &mut events),
        Op::Ack | Op::Event | Op::Update => on_change(core, msg, &mut events),
        Op::Other(word) if word == "im" => events.push(instant_message(&msg.props)),
        Op::Other(word) => debug!("Ignoring '{}' message", word),
    }
    events
}

/// Error-pattern text of an acknowledgment, if any
fn rejection(msg: &InboundMessage) -> Option<(ErrorChannel, String)> {
    if !matches!(msg.op, Op::Ack | Op::Other(_)) {
        return None;
    }
    STATUS_PROPS
        .iter()
        .filter_map(|name| msg.props.get(name).and_then(Value::as_str))
        .find_map(|text| ErrorChannel::classify(text).map(|channel| (channel, text.to_string())))
}

fn on_indication(core: &mut Core, msg: InboundMessage) {
    if msg.addresses("studio", Some("line")) {
        if let (Some(line), Some(state)) = (msg.id(), msg.props.get("state").and_then(Value::as_str)) {
            core.session.record_line_state(line, state);
        }
    }
    let key = WaiterKey::for_message(&msg);
    if !core.correlator.resolve(&key, msg.props) {
        debug!("Dropping indication with no pending request: {:?}", key);
    }
}

fn on_login(core: &mut Core, msg: InboundMessage, events: &mut Vec<ClientEvent>) {
    match msg.props.get("logged").map(Value::as_bool) {
        Some(Some(logged)) => {
            core.session.authenticated = logged;
            if !logged {
                warn!("The server reports the session as not logged in");
            }
            core.correlator.resolve(&WaiterKey::Login, msg.props);
            events.push(ClientEvent::LoggedIn { logged });
        }
        Some(None) => warn!("Ignoring login acknowledgment with a non-boolean 'logged' flag"),
        None => debug!("Acknowledgment on cc without a login flag"),
    }
}

fn on_change(core: &mut Core, msg: InboundMessage, events: &mut Vec<ClientEvent>) {
    if msg.object() != Some("studio") {
        debug!("Ignoring {} on {:?}", msg.op.as_str(), msg.object());
        return;
    }
    let is_ack = msg.op == Op::Ack;

    let sub = msg.sub.clone();
    match sub.as_deref() {
        None => {
            let session = &mut core.session;
            if let Some(studio_id) = msg.props.get("id").and_then(Value::as_i64) {
                let changed = !session.studio_selected || session.studio_id != Some(studio_id);
                session.studio_selected = true;
                session.studio_id = Some(studio_id);
                let resolved = core.correlator.resolve(&WaiterKey::SelectStudio, msg.props.clone());
                if is_ack || changed || resolved {
                    events.push(ClientEvent::StudioSelected { studio_id });
                }
            }
            if let Some(show_id) = msg.props.get("show_id").and_then(Value::as_i64) {
                let changed = core.session.show_id != Some(show_id);
                core.session.show_id = Some(show_id);
                let resolved = core.correlator.resolve(&WaiterKey::SelectShow, msg.props.clone());
                if is_ack || changed || resolved {
                    events.push(ClientEvent::ShowSelected { show_id });
                }
            }
            if !is_ack {
                events.push(ClientEvent::StudioChanged { props: msg.props });
            }
        }
        Some("line") if !is_ack => match msg.id.clone() {
            Some(line) => {
                if let Some(state) = msg.props.get("state").and_then(Value::as_str) {
                    core.session.record_line_state(&line, state);
                }
                events.push(ClientEvent::LineChanged { line, props: msg.props });
            }
            None => debug!("Line change without a line id"),
        },
        Some("book") if !is_ack => events.push(ClientEvent::BookChanged {
            book: msg.id,
            props: msg.props,
        }),
        Some("show") if !is_ack => events.push(ClientEvent::ShowChanged { props: msg.props }),
        Some("im") => events.push(instant_message(&msg.props)),
        Some(sub) => debug!("Ignoring {} on studio.{}", msg.op.as_str(), sub),
    }
}

fn instant_message(props: &Properties) -> ClientEvent {
    let text = |name: &str| props.get(name).and_then(Value::as_str).map(str::to_string);
    ClientEvent::InstantMessage { from: text("from"), message: text("message") }
}
