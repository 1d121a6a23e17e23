mod post;
mod project;

pub use post::{NewPost, Post};
pub use project::{NewProject, Project};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// A flat record kept in one collection of the document store.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Creation payload, the document without its id.
    type New: NewDocument;

    /// Collection the documents are stored under.
    const COLLECTION: &'static str;
    /// Singular name used in error messages and SSE event names.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn author(&self) -> &str;
    fn from_new(id: String, new: Self::New) -> Self;
}

pub trait NewDocument: DeserializeOwned + Send + 'static {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}
