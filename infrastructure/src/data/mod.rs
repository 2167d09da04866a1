//! Data service adapters.

mod memory;

pub use memory::InMemoryDataService;
