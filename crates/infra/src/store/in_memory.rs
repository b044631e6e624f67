use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{Collection, Document, StoreError};

/// In-memory collection backend.
///
/// Intended for tests/dev. Documents are kept deserialized; `list` returns
/// them in id order, which for UUIDv7 keys is also creation order.
#[derive(Debug, Default)]
pub struct InMemoryCollection<T> {
    docs: RwLock<BTreeMap<Uuid, T>>,
}

impl<T: Document> InMemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl<T: Document> Collection<T> for InMemoryCollection<T> {
    async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let docs = self
            .docs
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(docs.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        let docs = self
            .docs
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(docs.values().cloned().collect())
    }

    async fn upsert(&self, doc: &T) -> Result<(), StoreError> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        docs.insert(doc.doc_id(), doc.clone());
        Ok(())
    }

    async fn put_many(&self, batch: &[T]) -> Result<(), StoreError> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        for doc in batch {
            docs.insert(doc.doc_id(), doc.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(docs.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        text: String,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn doc_id(&self) -> Uuid {
            self.id
        }
    }

    fn note(text: &str) -> Note {
        Note {
            id: Uuid::now_v7(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let coll = InMemoryCollection::new();
        let n = note("first");
        coll.upsert(&n).await.unwrap();
        assert_eq!(coll.get(n.id).await.unwrap(), Some(n));
    }

    #[tokio::test]
    async fn second_upsert_wins() {
        let coll = InMemoryCollection::new();
        let mut n = note("first");
        coll.upsert(&n).await.unwrap();
        n.text = "second".to_string();
        coll.upsert(&n).await.unwrap();
        assert_eq!(coll.get(n.id).await.unwrap().unwrap().text, "second");
    }

    #[tokio::test]
    async fn put_many_lands_the_whole_batch() {
        let coll = InMemoryCollection::new();
        let batch = vec![note("a"), note("b"), note("c")];
        coll.put_many(&batch).await.unwrap();
        assert_eq!(coll.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let coll = InMemoryCollection::new();
        let n = note("gone");
        coll.upsert(&n).await.unwrap();
        assert!(coll.delete(n.id).await.unwrap());
        assert!(!coll.delete(n.id).await.unwrap());
        assert_eq!(coll.get(n.id).await.unwrap(), None);
    }
}
