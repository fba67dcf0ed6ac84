//! `cc`: connection-level operations

use crate::model::{ArgRule, OperationSpec, PropertyRule, ReplyKind};
use crate::value::Literal;

pub static STUDIO_LIST: OperationSpec = OperationSpec {
    method: "studio_list",
    props: &[PropertyRule::bare("studio_list")],
    reply: ReplyKind::Correlated,
    requires_studio: false,
    ..OperationSpec::base("cc")
};

pub static DATE: OperationSpec = OperationSpec {
    method: "date",
    props: &[PropertyRule::bare("date")],
    reply: ReplyKind::Correlated,
    requires_studio: false,
    ..OperationSpec::base("cc")
};

pub static GET_SERVER: OperationSpec = OperationSpec {
    method: "get_server",
    props: &[
        PropertyRule::bare("server_id"),
        PropertyRule::bare("server_version"),
        PropertyRule::bare("server_caps"),
        PropertyRule::bare("lwcp_version"),
    ],
    reply: ReplyKind::Correlated,
    requires_login: false,
    requires_studio: false,
    ..OperationSpec::base("cc")
};

pub static SET_MODE: OperationSpec = OperationSpec {
    method: "set_mode",
    verb: "set",
    props: &[PropertyRule::arg(
        "mode",
        ArgRule::string(0, "Mode")
            .upper()
            .one_of(&["TALENT", "PRODUCER"])
            .or(Literal::Str("TALENT")),
    )],
    requires_studio: false,
    ..OperationSpec::base("cc")
};

pub static LOGIN: OperationSpec = OperationSpec {
    method: "login",
    verb: "login",
    props: &[
        PropertyRule::arg("user", ArgRule::string(0, "Username").or(Literal::Str("user"))),
        PropertyRule::arg("password", ArgRule::string(1, "Password").or(Literal::Str(""))),
    ],
    reply: ReplyKind::Login,
    requires_login: false,
    requires_studio: false,
    ..OperationSpec::base("cc")
};

pub static PING: OperationSpec = OperationSpec {
    method: "ping",
    verb: "ping",
    reply: ReplyKind::Pong,
    requires_login: false,
    requires_studio: false,
    ..OperationSpec::base("cc")
};

pub(super) static OPERATIONS: &[&OperationSpec] = &[&STUDIO_LIST, &DATE, &GET_SERVER, &SET_MODE, &LOGIN, &PING];
