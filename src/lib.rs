// src/lib.rs — Library root for ManualMate

pub mod cli;
pub mod core;
pub mod infra;
pub mod provider;
