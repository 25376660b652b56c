//! Core logic: type definitions, resolution, validation, namespacing,
//! installation, and manifest loading.

pub mod builtin;
pub mod deps;
pub mod digest;
pub mod error;
pub mod graph;
pub mod handle;
pub mod manifest;
pub mod modtype;
pub mod module;
pub mod namespace;
pub mod naming;
pub mod parser;
pub mod resolver;
pub mod schema;
pub mod sdk;
pub mod source;
pub mod types;
pub mod validator;
