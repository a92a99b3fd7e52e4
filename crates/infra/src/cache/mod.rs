//! Local advisory session cache

pub mod file;

pub use file::FileSessionCache;
