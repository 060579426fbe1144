use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("Reminder not found: {0:?}")]
    NotFound(crate::core::types::ReminderId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scheduling error: {0}")]
    Schedule(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ReminderError>;
