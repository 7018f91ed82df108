pub mod base;
pub mod disk;

pub use base::StorageError;
pub use disk::DiskStorage;
