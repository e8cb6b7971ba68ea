//! Configuration schema, loader and write-back store.
//!
//! Settings come from a TOML file layered with environment overrides and are
//! persisted back to the same file whenever the settings panel changes a
//! value.

mod load;
mod schema;
mod store;

pub use load::expand_tilde;
pub use schema::*;
pub use store::SettingsStore;

#[cfg(test)]
mod tests;
