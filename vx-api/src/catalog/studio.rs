//! `studio`: the selected studio and its show, hybrids and messaging

use crate::model::{ArgRule, ErrorChannel, OperationSpec, PropertyRule, ReplyKind};
use crate::value::Literal;

pub static GET_STUDIO: OperationSpec = OperationSpec {
    method: "get_studio",
    props: &[
        PropertyRule::bare("id"),
        PropertyRule::bare("name"),
        PropertyRule::bare("show_id"),
        PropertyRule::bare("show_name"),
        PropertyRule::bare("num_lines"),
        PropertyRule::bare("num_hybrids"),
        PropertyRule::bare("num_hyb_fixed"),
        PropertyRule::bare("next"),
        PropertyRule::bare("pnext"),
        PropertyRule::bare("busy_all"),
        PropertyRule::bare("mute"),
        PropertyRule::bare("show_locked"),
        PropertyRule::bare("auto_answer"),
    ],
    reply: ReplyKind::Correlated,
    ..OperationSpec::base("studio")
};

pub static SHOW_LIST: OperationSpec = OperationSpec {
    method: "show_list",
    props: &[PropertyRule::bare("show_list")],
    reply: ReplyKind::Correlated,
    ..OperationSpec::base("studio")
};

pub static LINE_LIST: OperationSpec = OperationSpec {
    method: "line_list",
    props: &[PropertyRule::bare("line_list")],
    reply: ReplyKind::Correlated,
    ..OperationSpec::base("studio")
};

pub static HYBRID_LIST: OperationSpec = OperationSpec {
    method: "hybrid_list",
    props: &[PropertyRule::bare("hybrid_list")],
    reply: ReplyKind::Correlated,
    ..OperationSpec::base("studio")
};

pub static SELECT_STUDIO: OperationSpec = OperationSpec {
    method: "select_studio",
    verb: "select",
    props: &[PropertyRule::arg("id", ArgRule::number(0, "Studio ID").min(0.0))],
    reply: ReplyKind::SelectStudio,
    requires_studio: false,
    error_channel: Some(ErrorChannel::Studio),
    ..OperationSpec::base("studio")
};

pub static SELECT_SHOW: OperationSpec = OperationSpec {
    method: "select_show",
    verb: "select_show",
    props: &[PropertyRule::arg("id", ArgRule::number(0, "Show").min(1.0))],
    reply: ReplyKind::SelectShow,
    error_channel: Some(ErrorChannel::Show),
    ..OperationSpec::base("studio")
};

pub static IM: OperationSpec = OperationSpec {
    method: "im",
    verb: "im",
    props: &[
        PropertyRule::arg("from", ArgRule::string(0, "From User")),
        PropertyRule::arg("message", ArgRule::string(1, "Message Text")),
    ],
    ..OperationSpec::base("studio")
};

pub static SET_BUSY_ALL: OperationSpec = OperationSpec {
    method: "set_busy_all",
    verb: "busy_all",
    props: &[PropertyRule::arg("state", ArgRule::boolean(0, "All Busy State").or(Literal::Bool(true)))],
    ..OperationSpec::base("studio")
};

pub static DROP_HYBRID: OperationSpec = OperationSpec {
    method: "drop_hybrid",
    verb: "drop",
    props: &[PropertyRule::arg("hybrid", ArgRule::number(0, "Hybrid line ID").min(0.0))],
    ..OperationSpec::base("studio")
};

pub static HOLD_HYBRID: OperationSpec = OperationSpec {
    method: "hold_hybrid",
    verb: "hold",
    props: &[PropertyRule::arg("hybrid", ArgRule::number(0, "Hybrid line ID").min(0.0))],
    ..OperationSpec::base("studio")
};

pub(super) static OPERATIONS: &[&OperationSpec] = &[
    &GET_STUDIO,
    &SHOW_LIST,
    &LINE_LIST,
    &HYBRID_LIST,
    &SELECT_STUDIO,
    &SELECT_SHOW,
    &IM,
    &SET_BUSY_ALL,
    &DROP_HYBRID,
    &HOLD_HYBRID,
];
