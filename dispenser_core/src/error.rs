use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispenserError {
    #[error("sensor error: {0}")]
    Sensor(String),
    #[error("timeout waiting for sensor echo")]
    SensorTimeout,
    #[error("actuator fault: {0}")]
    Actuator(String),
    #[error("feedback error: {0}")]
    Feedback(String),
    #[error("input error: {0}")]
    Input(String),
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing presence sensor")]
    MissingSensor,
    #[error("missing pump")]
    MissingPump,
    #[error("missing feedback")]
    MissingFeedback,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
