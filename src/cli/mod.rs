//! Command line interface for the caselex binary.

pub mod args;
pub mod commands;
