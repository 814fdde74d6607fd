//! VEIL Runtime
//!
//! Process-level glue around `veil-core`:
//! - Startup: built-in enums and the console sink
//! - Console rendering of diagnostics through `tracing`
//! - Negotiation between several loaded instances

pub mod config;
pub mod console;
pub mod error;
pub mod negotiate;
pub mod runtime;

pub use config::*;
pub use console::DiagnosticConsoleLayer;
pub use error::*;
pub use negotiate::*;
pub use runtime::*;
