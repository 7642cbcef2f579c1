//! Native loggo commands

pub mod completion;
pub mod plugins;
