#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetError {
    /// A detent set must hold at least one detent.
    NoDetents,
    /// The controller has no host to measure against.
    NotAttached,
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetError::NoDetents => write!(f, "can't invalidate without any detents"),
            SheetError::NotAttached => write!(f, "sheet is not attached to a host"),
        }
    }
}

impl std::error::Error for SheetError {}
