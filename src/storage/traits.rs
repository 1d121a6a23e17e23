use thiserror::Error;

/// Raw document as kept by the store: its id, the author it references and
/// the JSON body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: String,
    pub author: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{collection} document {id} already exists")]
    Duplicate { collection: String, id: String },
    #[error("{collection} document {id} is corrupt: {source}")]
    Corrupt {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Collection-keyed JSON document store.
pub trait DocumentStore {
    fn insert(&self, collection: &str, doc: &StoredDocument) -> anyhow::Result<()>;
    fn load(&self, collection: &str, id: &str) -> anyhow::Result<Option<StoredDocument>>;
    /// All documents of `collection` in insertion order.
    fn list(&self, collection: &str) -> anyhow::Result<Vec<StoredDocument>>;
    fn list_by_author(
        &self,
        collection: &str,
        author: &str,
    ) -> anyhow::Result<Vec<StoredDocument>>;
    /// Returns `true` when a document was removed.
    fn delete(&self, collection: &str, id: &str) -> anyhow::Result<bool>;
    fn count(&self, collection: &str) -> anyhow::Result<u64>;
}
