//! Data types shared across the pipeline.

pub mod company;
pub mod config;
pub mod state;
