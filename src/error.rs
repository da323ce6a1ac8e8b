use std::io;

use thiserror::Error;

/// Rejections from the host command surface. None of these mutate game state.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("too few args")]
    TooFewArgs,
    #[error("command not supported: {0}")]
    Unsupported(String),
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
}

/// Why a round could not be started.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
}

impl From<StartError> for CommandError {
    fn from(err: StartError) -> Self {
        match err {
            StartError::Config(e) => CommandError::Config(e),
            StartError::Io(e) => CommandError::Io(e),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("playfield {width}x{height} is too small (minimum {min_width}x{min_height})")]
    FieldTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
    #[error("difficulty thresholds must be non-empty and strictly ascending")]
    BadThresholds,
}
