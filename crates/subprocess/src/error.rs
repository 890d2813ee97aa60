use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubprocessError {
    #[error("template {name:?} not found in the program's template map")]
    UnknownTemplate { name: String },
}

pub type SubprocessResult<T> = Result<T, SubprocessError>;
