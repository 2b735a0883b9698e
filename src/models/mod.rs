pub mod kv_entry;
#[cfg(feature = "server")]
pub mod config;
