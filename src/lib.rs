pub mod augment;
pub mod build;
pub mod classify;
pub mod cli;
pub mod config;
pub mod convert;
pub mod dialect;
pub mod error;
pub mod model;
pub mod parsers;
pub mod report;
pub mod span;
pub mod symbols;
