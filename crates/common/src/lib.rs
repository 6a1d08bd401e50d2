//! Pieces shared by every crate in the workspace: log setup, startup
//! environment checks and small wire types.

pub mod types;
pub mod utils;
pub mod env;
