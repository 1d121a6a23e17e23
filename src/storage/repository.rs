use std::marker::PhantomData;

use anyhow::Result;

use super::traits::{DocumentStore, StorageError, StoredDocument};
use crate::model::{Document, NewDocument};

/// Typed view over one collection of a [`DocumentStore`].
pub struct Repository<S, D> {
    store: S,
    _doc: PhantomData<fn() -> D>,
}

impl<S: DocumentStore, D: Document> Repository<S, D> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _doc: PhantomData,
        }
    }

    /// Validates `new`, assigns it a fresh id and stores it.
    pub fn save(&self, new: D::New) -> Result<D> {
        new.validate()?;

        let doc = D::from_new(uuid::Uuid::new_v4().to_string(), new);
        let stored = StoredDocument {
            id: doc.id().to_string(),
            author: doc.author().to_string(),
            body: serde_json::to_string(&doc)?,
        };
        self.store.insert(D::COLLECTION, &stored)?;
        log::debug!("saved {} {}", D::KIND, stored.id);
        Ok(doc)
    }

    pub fn find_all(&self) -> Result<Vec<D>> {
        self.store
            .list(D::COLLECTION)?
            .iter()
            .map(decode::<D>)
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<D>> {
        self.store
            .load(D::COLLECTION, id)?
            .as_ref()
            .map(decode::<D>)
            .transpose()
    }

    pub fn find_by_author(&self, author: &str) -> Result<Vec<D>> {
        self.store
            .list_by_author(D::COLLECTION, author)?
            .iter()
            .map(decode::<D>)
            .collect()
    }

    pub fn delete_by_id(&self, id: &str) -> Result<bool> {
        self.store.delete(D::COLLECTION, id)
    }

    pub fn count(&self) -> Result<u64> {
        self.store.count(D::COLLECTION)
    }
}

fn decode<D: Document>(stored: &StoredDocument) -> Result<D> {
    serde_json::from_str(&stored.body).map_err(|source| {
        StorageError::Corrupt {
            collection: D::COLLECTION.to_string(),
            id: stored.id.clone(),
            source,
        }
        .into()
    })
}
