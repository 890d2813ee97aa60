//! The per-instance state machine (§4.3).

/// A Statement Instance's lifecycle state. There is no explicit variant
/// for "does not exist yet" — that's represented by the instance slot in
/// the owning Process simply being absent (§3 "pre-state is
/// non-existent").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementState {
    DownClean,
    Up,
    DownUnclean,
    Dying,
    Dead,
}

impl StatementState {
    pub fn is_up(self) -> bool {
        matches!(self, StatementState::Up)
    }

    pub fn is_down(self) -> bool {
        matches!(self, StatementState::DownClean | StatementState::DownUnclean)
    }

    pub fn is_dead(self) -> bool {
        matches!(self, StatementState::Dead)
    }

    pub fn is_live(self) -> bool {
        !self.is_dead()
    }
}
