//! `studio.log`: the call log

use crate::model::{ArgRule, Expectation, OperationSpec, PropertyRule, ReplyKind};

pub static LOG_COUNT: OperationSpec = OperationSpec {
    method: "log_count",
    props: &[PropertyRule::bare("count")],
    reply: ReplyKind::Correlated,
    expects: &[Expectation { property: "count", rename: "logCount", each: &[] }],
    ..OperationSpec::base("studio.log")
};

pub static LOG_LIST: OperationSpec = OperationSpec {
    method: "log_list",
    props: &[
        PropertyRule::bare("list"),
        PropertyRule::arg("range", ArgRule::range(0, "List Range").optional()),
    ],
    reply: ReplyKind::Correlated,
    expects: &[Expectation {
        property: "list",
        rename: "logList",
        each: &[
            "lineStartTime",
            "lineDuration",
            "lineDirection",
            "lineLocal",
            "lineRemote",
            "lineCallerId",
        ],
    }],
    ..OperationSpec::base("studio.log")
};

pub(super) static OPERATIONS: &[&OperationSpec] = &[&LOG_COUNT, &LOG_LIST];
