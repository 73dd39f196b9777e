use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("wrong time format, expected HH:MM:SS, got {0}")]
    WrongFormat(String),
    #[error("minute component out of range in {0}")]
    MinuteOutOfRange(String),
    #[error("second component out of range in {0}")]
    SecondOutOfRange(String),
}
