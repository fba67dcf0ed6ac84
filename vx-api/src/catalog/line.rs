//! `studio.line`: per-line call control

use crate::model::{ArgRule, ErrorChannel, IdRule, LineStateRule, OperationSpec, PropertyRule, ReplyKind};
use crate::value::Literal;

const LINE_NUMBER: IdRule = IdRule::Arg(ArgRule::number(0, "Line Number").min(1.0));

pub static GET_LINE: OperationSpec = OperationSpec {
    method: "get_line",
    id: LINE_NUMBER,
    props: &[
        PropertyRule::bare("state"),
        PropertyRule::bare("callstate"),
        PropertyRule::bare("name"),
        PropertyRule::bare("local"),
        PropertyRule::bare("remote"),
        PropertyRule::bare("hybrid"),
        PropertyRule::bare("time"),
        PropertyRule::bare("comment"),
        PropertyRule::bare("direction"),
        PropertyRule::bare("caller_id"),
    ],
    reply: ReplyKind::Correlated,
    error_channel: Some(ErrorChannel::Line),
    ..OperationSpec::base("studio.line")
};

pub static GET_CALLER_ID: OperationSpec = OperationSpec {
    method: "get_caller_id",
    id: LINE_NUMBER,
    props: &[PropertyRule::bare("caller_id")],
    reply: ReplyKind::Correlated,
    error_channel: Some(ErrorChannel::Line),
    ..OperationSpec::base("studio.line")
};

pub static SET_LINE_COMMENT: OperationSpec = OperationSpec {
    method: "set_line_comment",
    verb: "set",
    id: LINE_NUMBER,
    props: &[PropertyRule::arg("comment", ArgRule::string(1, "Comment"))],
    line_state: LineStateRule::Not(&["IDLE"]),
    ..OperationSpec::base("studio.line")
};

pub static SET_CALLER_ID: OperationSpec = OperationSpec {
    method: "set_caller_id",
    verb: "set",
    id: LINE_NUMBER,
    props: &[PropertyRule::arg("caller_id", ArgRule::string(1, "Caller ID"))],
    line_state: LineStateRule::Not(&["IDLE"]),
    ..OperationSpec::base("studio.line")
};

pub static SEIZE_LINE: OperationSpec = OperationSpec {
    method: "seize_line",
    verb: "seize",
    id: LINE_NUMBER,
    ..OperationSpec::base("studio.line")
};

pub static CALL_LINE: OperationSpec = OperationSpec {
    method: "call_line",
    verb: "call",
    id: LINE_NUMBER,
    props: &[
        PropertyRule::arg("number", ArgRule::string(1, "Remote Number")),
        PropertyRule::arg("handset", ArgRule::boolean(2, "Handset").key("handset").optional()),
        PropertyRule::arg("hybrid", ArgRule::number(2, "Hybrid").key("hybrid").optional()),
        PropertyRule::arg("port", ArgRule::number(2, "Port").key("port").optional()),
    ],
    ..OperationSpec::base("studio.line")
};

pub static TAKE_LINE: OperationSpec = OperationSpec {
    method: "take_line",
    verb: "take",
    id: LINE_NUMBER,
    props: &[
        PropertyRule::arg("handset", ArgRule::boolean(1, "Handset").key("handset").optional()),
        PropertyRule::arg("hybrid", ArgRule::number(1, "Hybrid ID").key("hybrid").optional()),
    ],
    ..OperationSpec::base("studio.line")
};

pub static TAKE_NEXT: OperationSpec = OperationSpec {
    method: "take_next",
    verb: "take",
    ..OperationSpec::base("studio.line")
};

pub static DROP_LINE: OperationSpec = OperationSpec {
    method: "drop_line",
    verb: "drop",
    id: LINE_NUMBER,
    ..OperationSpec::base("studio.line")
};

pub static LOCK_LINE: OperationSpec = OperationSpec {
    method: "lock_line",
    verb: "lock",
    id: LINE_NUMBER,
    line_state: LineStateRule::Is(&["ON_AIR"]),
    ..OperationSpec::base("studio.line")
};

pub static UNLOCK_LINE: OperationSpec = OperationSpec {
    method: "unlock_line",
    verb: "unlock",
    id: LINE_NUMBER,
    line_state: LineStateRule::Is(&["ON_AIR_LOCKED"]),
    ..OperationSpec::base("studio.line")
};

pub static HOLD_LINE: OperationSpec = OperationSpec {
    method: "hold_line",
    verb: "hold",
    id: LINE_NUMBER,
    props: &[PropertyRule::arg("ready", ArgRule::boolean(1, "Ready State").or(Literal::Bool(false)))],
    ..OperationSpec::base("studio.line")
};

pub static RAISE_LINE: OperationSpec = OperationSpec {
    method: "raise_line",
    verb: "raise",
    id: LINE_NUMBER,
    ..OperationSpec::base("studio.line")
};

pub(super) static OPERATIONS: &[&OperationSpec] = &[
    &GET_LINE,
    &GET_CALLER_ID,
    &SET_LINE_COMMENT,
    &SET_CALLER_ID,
    &SEIZE_LINE,
    &CALL_LINE,
    &TAKE_LINE,
    &TAKE_NEXT,
    &DROP_LINE,
    &LOCK_LINE,
    &UNLOCK_LINE,
    &HOLD_LINE,
    &RAISE_LINE,
];
