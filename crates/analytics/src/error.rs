use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid engine settings: {0}")]
    InvalidSettings(String),
}
