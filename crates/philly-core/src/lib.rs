//! Philly Core Types
//!
//! This crate provides the data model shared by the PhillyScript parser and
//! the JavaScript generator:
//!
//! - **Leaves**: One tagged record per source construct ([`leaf::Leaf`])
//! - **Programs**: The flat, ordered leaf sequence of one compilation run
//!   ([`program::Program`])

pub mod leaf;
pub mod program;

pub use leaf::Leaf;
pub use program::Program;
