//! Ready-made output sinks
//!
//! Any `std::io::Write + Send` value can be handed to a logger; these cover
//! the common destinations.

pub mod console;
pub mod file;
pub mod memory;

pub use console::{ConsoleSink, ConsoleTarget};
pub use file::FileSink;
pub use memory::MemorySink;
