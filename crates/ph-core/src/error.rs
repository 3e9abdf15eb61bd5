use thiserror::Error;

pub type PhResult<T> = Result<T, PhError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
