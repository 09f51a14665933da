//! Configuration management for the tiling solver

pub mod settings;

pub use settings::{
    Settings, SolverConfig, ParsingConfig, OutputConfig, ParseMode, OutputFormat,
    CliOverrides, SolverBackend
};
