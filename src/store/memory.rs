use super::{AuctionFilter, AuctionRecord, AuctionStore, AuctionUpdate, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// 메모리 경매 저장소
/// DATABASE_URL 이 없을 때와 테스트에서 사용한다.
#[derive(Debug, Default)]
pub struct InMemoryAuctionStore {
    auctions: RwLock<HashMap<String, AuctionRecord>>,
    update_calls: AtomicUsize,
}

impl InMemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// update_many 호출 횟수
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.auctions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.auctions.read().await.is_empty()
    }
}

#[async_trait]
impl AuctionStore for InMemoryAuctionStore {
    async fn insert_one(&self, record: AuctionRecord) -> Result<(), StorageError> {
        let mut auctions = self.auctions.write().await;
        if auctions.contains_key(&record.id) {
            return Err(StorageError::DuplicateId(record.id));
        }
        auctions.insert(record.id.clone(), record);
        Ok(())
    }

    async fn update_many(
        &self,
        filter: AuctionFilter,
        update: AuctionUpdate,
    ) -> Result<u64, StorageError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let mut auctions = self.auctions.write().await;
        let status = update.status.as_str();
        let mut modified = 0;
        for record in auctions.values_mut() {
            if filter.matches(record) && record.status != status {
                record.status = status.to_string();
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn find_one(&self, id: &str) -> Result<Option<AuctionRecord>, StorageError> {
        Ok(self.auctions.read().await.get(id).cloned())
    }

    async fn find_many(&self, filter: AuctionFilter) -> Result<Vec<AuctionRecord>, StorageError> {
        let auctions = self.auctions.read().await;
        let mut found: Vec<AuctionRecord> = auctions
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }
}
