//! Settings schema and loading.
//!
//! Settings come from an optional TOML file overlaid by `SCROBDL__*`
//! environment variables, with struct defaults for anything left unset.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;

#[cfg(test)]
mod tests;
