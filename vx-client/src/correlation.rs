//! Correlation of inbound replies with the calls awaiting them
//!
//! The wire is one ordered stream shared by every in-flight request. Each
//! reply-expecting call registers a one-shot waiter under a key derived from
//! the request; the dispatcher resolves the oldest waiter under the key
//! computed from the inbound message. Waiters under the same key form a FIFO
//! queue.
//!
//! A call with an error channel also sits in that channel's queue. Whichever
//! queue fires first resolves the call and removes it from the other, so a
//! call is resolved exactly once.

use std::collections::{HashMap, VecDeque};

use lwcp_parser::{InboundMessage, Properties};
use tokio::sync::oneshot;
use vx_api::{ErrorChannel, OperationSpec, ReplyKind, Request};

/// Identity under which a waiter is registered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WaiterKey {
    /// `indi` replies echoing namespace, id and property names
    Reply(String),
    Login,
    SelectStudio,
    SelectShow,
    Pong,
    Error(ErrorChannel),
}

impl WaiterKey {
    /// Key of the reply a request will receive, if it expects one
    pub fn for_request(spec: &OperationSpec, request: &Request) -> Option<WaiterKey> {
        match spec.reply {
            ReplyKind::None => None,
            ReplyKind::Login => Some(WaiterKey::Login),
            ReplyKind::SelectStudio => Some(WaiterKey::SelectStudio),
            ReplyKind::SelectShow => Some(WaiterKey::SelectShow),
            ReplyKind::Pong => Some(WaiterKey::Pong),
            ReplyKind::Correlated => Some(WaiterKey::Reply(reply_key(
                request.object(),
                request.sub(),
                request.id.as_deref(),
                request.property_names(),
            ))),
        }
    }

    /// Key an `indi` message resolves
    pub fn for_message(msg: &InboundMessage) -> WaiterKey {
        WaiterKey::Reply(reply_key(
            msg.object().unwrap_or_default(),
            msg.sub(),
            msg.id(),
            msg.props.names(),
        ))
    }
}

/// `object.sub#id name,name,...`; property values never take part
pub fn reply_key<'a>(
    object: &str,
    sub: Option<&str>,
    id: Option<&str>,
    names: impl Iterator<Item = &'a str>,
) -> String {
    let mut key = String::from(object);
    if let Some(sub) = sub {
        key.push('.');
        key.push_str(sub);
    }
    if let Some(id) = id {
        key.push('#');
        key.push_str(id.trim().trim_matches('"'));
    }
    key.push(' ');
    key.push_str(&names.collect::<Vec<_>>().join(","));
    key
}

/// How a waiter was resolved
#[derive(Debug, Clone, PartialEq)]
pub enum WaiterOutcome {
    Reply(Properties),
    /// The far end reported an error for this call
    Rejected(String),
    /// The connection closed first
    Disconnected,
}

/// Handle identifying one registered waiter
pub type Ticket = u64;

#[derive(Debug)]
struct Pending {
    key: WaiterKey,
    error_key: Option<WaiterKey>,
    tx: oneshot::Sender<WaiterOutcome>,
}

/// Table of every waiter awaiting a reply
#[derive(Debug, Default)]
pub struct Correlator {
    next_ticket: Ticket,
    pending: HashMap<Ticket, Pending>,
    queues: HashMap<WaiterKey, VecDeque<Ticket>>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a waiter under `key`, and under the error channel if given
    pub fn register(
        &mut self,
        key: WaiterKey,
        error_channel: Option<ErrorChannel>,
    ) -> (Ticket, oneshot::Receiver<WaiterOutcome>) {
        let (tx, rx) = oneshot::channel();
        let ticket = self.next_ticket;
        self.next_ticket = self.next_ticket.wrapping_add(1);

        let error_key = error_channel.map(WaiterKey::Error);
        self.queues.entry(key.clone()).or_default().push_back(ticket);
        if let Some(error_key) = &error_key {
            self.queues.entry(error_key.clone()).or_default().push_back(ticket);
        }
        self.pending.insert(ticket, Pending { key, error_key, tx });
        (ticket, rx)
    }

    /// Resolve the oldest waiter under `key`; false when none is waiting
    pub fn resolve(&mut self, key: &WaiterKey, props: Properties) -> bool {
        match self.take_front(key) {
            Some(pending) => {
                let _ = pending.tx.send(WaiterOutcome::Reply(props));
                true
            }
            None => false,
        }
    }

    /// Fail the oldest waiter linked to `channel`; false when none is waiting
    pub fn fail(&mut self, channel: ErrorChannel, message: &str) -> bool {
        match self.take_front(&WaiterKey::Error(channel)) {
            Some(pending) => {
                let _ = pending.tx.send(WaiterOutcome::Rejected(message.to_string()));
                true
            }
            None => false,
        }
    }

    /// Deregister a waiter that is no longer awaited; no-op once resolved
    pub fn cancel(&mut self, ticket: Ticket) {
        if let Some(pending) = self.pending.remove(&ticket) {
            self.unlink(ticket, &pending.key);
            if let Some(error_key) = &pending.error_key {
                self.unlink(ticket, error_key);
            }
        }
    }

    /// Resolve every waiter with [`WaiterOutcome::Disconnected`]
    pub fn fail_all(&mut self) -> usize {
        let count = self.pending.len();
        for (_, pending) in self.pending.drain() {
            let _ = pending.tx.send(WaiterOutcome::Disconnected);
        }
        self.queues.clear();
        count
    }

    pub fn is_waiting(&self, key: &WaiterKey) -> bool {
        self.queues.get(key).map_or(false, |queue| !queue.is_empty())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Tickets still queued under any key; equals the number of live queue entries
    pub fn queued_count(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    fn take_front(&mut self, key: &WaiterKey) -> Option<Pending> {
        let ticket = self.queues.get_mut(key)?.pop_front()?;
        if self.queues.get(key).map_or(false, VecDeque::is_empty) {
            self.queues.remove(key);
        }
        let pending = self.pending.remove(&ticket)?;
        // drop the sibling entry so the other queue cannot fire for this call
        let sibling = if &pending.key == key { pending.error_key.clone() } else { Some(pending.key.clone()) };
        if let Some(sibling) = sibling {
            self.unlink(ticket, &sibling);
        }
        Some(pending)
    }

    fn unlink(&mut self, ticket: Ticket, key: &WaiterKey) {
        if let Some(queue) = self.queues.get_mut(key) {
            queue.retain(|t| *t != ticket);
            if queue.is_empty() {
                self.queues.remove(key);
            }
        }
    }
}
