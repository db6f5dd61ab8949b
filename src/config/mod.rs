//! Filesystem locations and defaults used by the settle binary.
//!
//! The store itself takes explicit paths; this module only decides where
//! the command-line tool keeps its settings file and logs.

mod defaults;
mod paths;

#[cfg(test)]
mod tests;

pub use defaults::load_defaults;
pub use paths::ConfigPaths;
