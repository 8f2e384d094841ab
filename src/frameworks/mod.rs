// Frameworks layer: configuration loading and the terminal host.

pub mod cli;
pub mod config;
