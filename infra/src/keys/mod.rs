//! Key source adapters

pub mod file_key_source;

pub use file_key_source::FileKeySource;
