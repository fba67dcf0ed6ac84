//! # lwcp-parser
//!
//! Message model and line parser for the Livewire control protocol (LWCP) spoken
//! by Telos VX broadcast phone systems.
//!
//! Every inbound line has the shape
//!
//! ```text
//! <op> <object>[.<sub>][#<id>] <prop>=<value>, <prop>=<value>, ...
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use lwcp_parser::{parse_line, Op, Value};
//!
//! let msg = parse_line(r#"event studio.line#2 state=RINGING, name="Caller""#).unwrap();
//! assert_eq!(msg.op, Op::Event);
//! assert_eq!(msg.sub(), Some("line"));
//! assert_eq!(msg.props.get("state"), Some(&Value::Enum("RINGING".into())));
//! ```
//!
//! The client only depends on the [`LineParser`] trait, so the grammar can be
//! swapped for another implementation.

pub mod error;
pub mod grammar;
pub mod message;
pub mod value;

pub use error::{ParseError, ParseResult};
pub use grammar::{parse_line, parse_message};
pub use message::{InboundMessage, LineParser, LwcpParser, Op};
pub use value::{Properties, Value};
