use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("template {name:?} not found in the program's template map")]
    UnknownTemplate { name: String },

    #[error(transparent)]
    Registry(#[from] ncd_registry::RegistryError),

    #[error(transparent)]
    Value(#[from] ncd_value::ValueError),

    #[error(transparent)]
    Runtime(#[from] ncd_runtime::RuntimeError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
