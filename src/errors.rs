// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::EventId;

#[derive(Error, Debug)]
pub enum DeciderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("event {0} not found in history")]
    EventNotFound(EventId),

    #[error("history references unknown task '{0}'")]
    UnknownTask(String),

    #[error("decision round inconsistency: {0}")]
    RoundInconsistency(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DeciderError>;
