use crate::entry::EntryValidationError;
use crate::types::EntryId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntryId },

    #[error(transparent)]
    InvalidEntry(#[from] EntryValidationError),

    #[error("Validation failed: {0}")]
    Validation(String),
}
