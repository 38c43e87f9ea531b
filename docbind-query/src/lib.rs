//! Query expressions for the docbind remote document store.
//!
//! An [`Expr`] is an opaque, serializable description of an operation the
//! remote store evaluates. This crate only builds expressions; it attaches
//! no evaluation semantics to them. The mapper uses the write constructors
//! ([`Expr::create`], [`Expr::update`], [`Expr::replace`], [`Expr::delete`])
//! and [`Expr::get`]; the paging constructors are provided for callers that
//! compose index-backed reads.
//!
//! # Wire shape
//!
//! Function calls are JSON objects keyed by the function name, with named
//! arguments alongside:
//!
//! ```text
//! {"create": {"@ref": "classes/users"}, "params": {"object": {"data": {"object": {"x": 5}}}}}
//! ```
//!
//! Literal objects are quoted with `{"object": ...}` so the store does not
//! mistake them for calls.

mod expr;

pub use expr::{Expr, OPERATIONS, unquote};
