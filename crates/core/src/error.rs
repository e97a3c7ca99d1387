/// Errors raised while configuring or driving the widget
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("empty draw range: [{min}, {max})")]
    InvalidRange { min: i64, max: i64 },
    #[error("{name} must be greater than zero")]
    InvalidDuration { name: &'static str },
    #[error("invalid value {value:?} for query parameter `{key}`")]
    InvalidParam { key: String, value: String },
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

pub type Result<T> = std::result::Result<T, Error>;
