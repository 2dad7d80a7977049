//! Utility modules for the static site generator.

pub mod css;
pub mod date;
pub mod exec;
pub mod glob;
pub mod js;
pub mod minify;
pub mod slug;
