//! CLI infrastructure for the intruder simulation
//!
//! This module provides the command-line interface for headless training,
//! paced watching and learned-vs-baseline comparison.

pub mod commands;
pub mod output;
