use crate::domain::AppError;

/// Port for the tracked-file store that records project modifications.
pub trait ChangeStore: Send {
    /// Persist pending changes.
    fn save(&mut self) -> Result<(), AppError>;
}

/// Store used when the host does not track file changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChangeStore;

impl ChangeStore for NoopChangeStore {
    fn save(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}
