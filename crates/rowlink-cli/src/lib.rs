//! Library components of the rowlink CLI.

pub mod logging;
pub mod settings;
