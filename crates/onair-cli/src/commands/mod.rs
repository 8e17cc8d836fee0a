//! CLI subcommand implementations.

pub mod coverage;
pub mod grid;
pub mod now;
pub mod util;
pub mod validate;
pub mod watch;
