//! `studio.book`: the caller phone book

use crate::model::{ArgRule, IdRule, OperationSpec, PropertyRule, ReplyKind};

const RECORD_NUMBER: IdRule = IdRule::Arg(ArgRule::number(0, "Record Number").min(1.0));
const RECORD_TYPES: &[&str] = &["GLOBAL", "STUDIO", "SHOW"];

pub static RECORD_COUNT: OperationSpec = OperationSpec {
    method: "record_count",
    props: &[PropertyRule::bare("count")],
    reply: ReplyKind::Correlated,
    ..OperationSpec::base("studio.book")
};

pub static RECORD_LIST: OperationSpec = OperationSpec {
    method: "record_list",
    props: &[
        PropertyRule::bare("list"),
        PropertyRule::arg("range", ArgRule::range(0, "List Range").optional()),
    ],
    reply: ReplyKind::Correlated,
    ..OperationSpec::base("studio.book")
};

pub static ADD_RECORD: OperationSpec = OperationSpec {
    method: "add_record",
    verb: "add",
    props: &[
        PropertyRule::arg("type", ArgRule::string(0, "type").key("type").upper().one_of(RECORD_TYPES).optional()),
        PropertyRule::arg("name", ArgRule::string(0, "name").key("name")),
        PropertyRule::arg("number", ArgRule::string(0, "number").key("number")),
    ],
    ..OperationSpec::base("studio.book")
};

pub static UPDATE_RECORD: OperationSpec = OperationSpec {
    method: "update_record",
    verb: "set",
    id: RECORD_NUMBER,
    props: &[
        PropertyRule::arg("type", ArgRule::string(1, "type").key("type").upper().one_of(RECORD_TYPES).optional()),
        PropertyRule::arg("name", ArgRule::string(1, "name").key("name").optional()),
        PropertyRule::arg("number", ArgRule::string(1, "number").key("number").optional()),
    ],
    ..OperationSpec::base("studio.book")
};

pub static DELETE_RECORD: OperationSpec = OperationSpec {
    method: "delete_record",
    verb: "del",
    id: RECORD_NUMBER,
    ..OperationSpec::base("studio.book")
};

pub(super) static OPERATIONS: &[&OperationSpec] =
    &[&RECORD_COUNT, &RECORD_LIST, &ADD_RECORD, &UPDATE_RECORD, &DELETE_RECORD];
