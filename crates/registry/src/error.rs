use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no module registered for type {type_name}")]
    UnknownType { type_name: String },

    #[error("module {method_type} has no method_base, but was invoked as a method of {object_base}")]
    NotAMethod {
        method_type: String,
        object_base: String,
    },

    #[error("module {method_type} requires a method object of base type {expected}, got {actual}")]
    MethodBaseMismatch {
        method_type: String,
        expected: String,
        actual: String,
    },
}

pub type RegistryResult<T> = Result<T, RegistryError>;
