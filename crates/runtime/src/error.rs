use thiserror::Error;

use crate::state::StatementState;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("die() called while instance is in state {state:?}, must be UP/DOWN_CLEAN/DOWN_UNCLEAN")]
    DieFromIllegalState { state: StatementState },

    #[error("clean() called while instance is in state {state:?}, must be DOWN_CLEAN/DOWN_UNCLEAN")]
    CleanFromIllegalState { state: StatementState },

    #[error("get_var/get_obj denied: module cannot resolve while state is {state:?}")]
    ResolutionDenied { state: StatementState },

    #[error(transparent)]
    Registry(#[from] ncd_registry::RegistryError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
