//! Request model and request builder for the Telos VX LWCP control protocol
//!
//! Every operation the client can perform is described by a static
//! [`OperationSpec`] in the [`catalog`]. [`build_request`] validates caller
//! arguments against that description and renders the outbound frame.
//!
//! # Example
//!
//! ```
//! use vx_api::{args, build_request, catalog};
//!
//! let spec = catalog::lookup("call_line").unwrap();
//! let request = build_request(spec, &args![2u32, "5550100"]).unwrap();
//! assert_eq!(request.to_wire(), r#"call studio.line#2 number="5550100""#);
//! ```

pub mod builder;
pub mod catalog;
pub mod decode;
pub mod error;
pub mod model;
pub mod value;

pub use builder::{build_request, resolve_argument, Request, RequestProperty};
pub use decode::apply_expectations;
pub use error::{BuildError, ModelError, Result, ValidationError};
pub use model::{
    ArgRule, ArgType, ErrorChannel, Expectation, IdRule, LineStateRule, OperationSpec, PropertyRule,
    PropertyValue, ReplyKind, StringModifier,
};
pub use value::{stringify, ArgValue, IntoArg, Literal};
