//! Main module for pipefix library functionality

pub mod config;
pub mod lexing;
pub mod operators;
pub mod preprocessor;
pub mod runtime;
pub mod token;
pub mod transforms;
pub mod variables;
