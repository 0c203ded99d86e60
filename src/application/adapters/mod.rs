//! Resume storage adapters.

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemResumeStore;
pub use memory::InMemoryResumeStore;
