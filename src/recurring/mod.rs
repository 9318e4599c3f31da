//! Recurring expense materialization

pub mod materializer;

pub use materializer::*;
