//! Readers for the Linux `/proc` filesystem.
//!
//! `parser` holds the pure text parsers; `system` wires them to a
//! [`FileSystem`](crate::collector::FileSystem) and a proc root.

pub mod parser;
pub mod system;

pub use parser::ParseError;
pub use system::SystemCollector;
