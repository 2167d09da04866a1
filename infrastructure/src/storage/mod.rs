//! Result repositories.
//!
//! - [`InMemoryResultRepository`]: process-local, for tests and one-shot runs
//! - [`JsonFileResultRepository`]: one pretty-printed JSON file per session

mod json_file;
mod memory;

pub use json_file::JsonFileResultRepository;
pub use memory::InMemoryResultRepository;
