//! Typed collections over sled trees.

use scaffold_common::{Result, ScaffoldError};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use tracing::debug;
use uuid::Uuid;

/// A record stored as one JSON document in a collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection (tree suffix) the documents live in.
    const COLLECTION: &'static str;

    /// Primary key of the document.
    fn id(&self) -> Uuid;
}

/// Collection of documents of one type.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    tree: sled::Tree,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Collection<T> {
    pub(crate) const fn new(tree: sled::Tree) -> Self {
        Self {
            tree,
            _marker: PhantomData,
        }
    }

    /// Number of documents.
    pub fn count(&self) -> usize {
        self.tree.len()
    }

    /// Every document in key order.
    pub fn find_all(&self) -> Result<Vec<T>> {
        self.tree
            .iter()
            .map(|item| {
                let (_, value) = item.map_err(|e| {
                    ScaffoldError::database_with_source(
                        format!("cannot scan collection {}", T::COLLECTION),
                        e,
                    )
                })?;
                Ok(serde_json::from_slice(&value)?)
            })
            .collect()
    }

    /// First document matching the predicate, scanning the whole collection.
    pub fn find_one<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.find_all()?.into_iter().find(|doc| predicate(doc)))
    }

    /// Document stored under `id`.
    pub fn get(&self, id: Uuid) -> Result<Option<T>> {
        let value = self.tree.get(id.as_bytes()).map_err(|e| {
            ScaffoldError::database_with_source(
                format!("cannot read {id} from {}", T::COLLECTION),
                e,
            )
        })?;
        value
            .map(|bytes| serde_json::from_slice(&bytes).map_err(Into::into))
            .transpose()
    }

    /// Inserts a new document; fails if its id is already taken.
    pub async fn insert_one(&self, doc: &T) -> Result<()> {
        let id = doc.id();
        let bytes = serde_json::to_vec(doc)?;

        self.tree
            .compare_and_swap(id.as_bytes(), None as Option<&[u8]>, Some(bytes))
            .map_err(|e| {
                ScaffoldError::database_with_source(
                    format!("cannot insert into {}", T::COLLECTION),
                    e,
                )
            })?
            .map_err(|_| {
                ScaffoldError::database(format!(
                    "document {id} already exists in {}",
                    T::COLLECTION
                ))
            })?;

        self.flush().await?;
        debug!("Inserted document {id} into {}", T::COLLECTION);
        Ok(())
    }

    /// Writes the document, replacing any previous version.
    pub async fn save(&self, doc: &T) -> Result<()> {
        let id = doc.id();
        let bytes = serde_json::to_vec(doc)?;

        self.tree.insert(id.as_bytes(), bytes).map_err(|e| {
            ScaffoldError::database_with_source(format!("cannot save into {}", T::COLLECTION), e)
        })?;

        self.flush().await?;
        debug!("Saved document {id} in {}", T::COLLECTION);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.tree.flush_async().await.map_err(|e| {
            ScaffoldError::database_with_source(format!("cannot flush {}", T::COLLECTION), e)
        })?;
        Ok(())
    }
}
