//! Command-line interface module.

mod commands;
mod render;
mod validate;
mod voices;

pub use commands::{Cli, Commands};
pub use render::render;
pub use validate::validate;
pub use voices::list_voices;
