//! Host implementations shipped with the scanner.
//!
//! Real hosts live with the content tooling that embeds the scanner; the
//! in-memory host here backs the CLI and the test-suite.

pub mod memory;

pub use memory::{Manifest, MemoryHost};
