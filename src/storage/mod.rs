//! Storage abstraction for index files.

pub mod file;
pub mod memory;
pub mod structured;
pub mod traits;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use structured::{StructReader, StructWriter};
pub use traits::{Storage, StorageConfig, StorageInput, StorageOutput};
