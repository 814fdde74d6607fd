//! VEIL Core - Encapsulation primitives
//!
//! This crate defines the building blocks shared by every VEIL consumer:
//! - Dynamic values and their runtime kinds
//! - Guards that assert a value's kind
//! - Read-only views over privately owned stores
//! - Ordered, comparable enum sets built on views
//! - The built-in Kind and Diagnostic enums

pub mod error;
pub mod value;
pub mod guard;
pub mod behavior;
pub mod view;
pub mod enumeration;
pub mod builtins;

pub use error::*;
pub use value::*;
pub use guard::*;
pub use behavior::*;
pub use view::*;
pub use enumeration::*;
pub use builtins::*;
