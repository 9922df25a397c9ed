/// 경매 저장소 (리포지토리)
/// 도메인 경매와 저장 레코드 간 변환, 생성 및 만료 처리
// region:    --- Imports
use crate::auction::{expiration_cutoff, Auction};
use crate::error::{AuctionError, Result};
use crate::store::{AuctionFilter, AuctionRecord, AuctionStore, AuctionUpdate};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
// endregion: --- Imports

// region:    --- Auction Repository
pub struct AuctionRepository {
    store: Arc<dyn AuctionStore>,
    // 만료 처리만 직렬화한다. 생성은 잠그지 않는다.
    expire_guard: Mutex<()>,
}

impl AuctionRepository {
    pub fn new(store: Arc<dyn AuctionStore>) -> Self {
        Self {
            store,
            expire_guard: Mutex::new(()),
        }
    }

    /// 경매 생성
    pub async fn create_auction(&self, auction: &Auction) -> Result<()> {
        let record = AuctionRecord::from(auction);
        if let Err(e) = self.store.insert_one(record).await {
            error!(
                "{:<12} --> 경매 생성 실패 id: {}: {:?}",
                "Repository", auction.id, e
            );
            return Err(e.into());
        }
        debug!("{:<12} --> 경매 생성 id: {}", "Repository", auction.id);
        Ok(())
    }

    /// 경매 조회
    pub async fn find_auction_by_id(&self, id: &str) -> Result<Auction> {
        let record = self.store.find_one(id).await.map_err(|e| {
            error!("{:<12} --> 경매 조회 실패 id: {}: {:?}", "Repository", id, e);
            AuctionError::from(e)
        })?;

        match record {
            Some(record) => Ok(Auction::try_from(record)?),
            None => Err(AuctionError::NotFound(id.to_string())),
        }
    }

    /// 조건별 경매 목록 조회
    pub async fn find_auctions(&self, filter: AuctionFilter) -> Result<Vec<Auction>> {
        let records = self.store.find_many(filter).await.map_err(|e| {
            error!("{:<12} --> 경매 목록 조회 실패: {:?}", "Repository", e);
            AuctionError::from(e)
        })?;

        records
            .into_iter()
            .map(|record| Auction::try_from(record).map_err(AuctionError::from))
            .collect()
    }

    /// 만료된 경매 종료
    /// 종료 처리된 경매 수를 반환한다.
    pub async fn expire_overdue(&self, auction_interval: Duration) -> Result<u64> {
        self.expire_overdue_at(Utc::now(), auction_interval).await
    }

    /// 기준 시각 now 에 대해 만료된 경매 종료
    pub async fn expire_overdue_at(
        &self,
        now: DateTime<Utc>,
        auction_interval: Duration,
    ) -> Result<u64> {
        let _guard = self.expire_guard.lock().await;

        let cutoff = expiration_cutoff(now, auction_interval);
        let modified = self
            .store
            .update_many(AuctionFilter::overdue(cutoff), AuctionUpdate::complete())
            .await
            .map_err(|e| {
                error!("{:<12} --> 만료 경매 종료 실패: {:?}", "Repository", e);
                AuctionError::from(e)
            })?;

        if modified > 0 {
            info!("{:<12} --> 만료 경매 {}건 종료", "Repository", modified);
        }
        Ok(modified)
    }
}
// endregion: --- Auction Repository

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::{AuctionStatus, ProductCondition};
    use crate::config::ExpirationConfig;
    use crate::store::{InMemoryAuctionStore, MockAuctionStore, StorageError};

    fn auction_aged(now: DateTime<Utc>, age_secs: i64) -> Auction {
        Auction {
            timestamp: now - chrono::Duration::seconds(age_secs),
            ..Auction::new("Watch", "Accessories", "Swiss automatic watch", ProductCondition::Used)
        }
    }

    fn repository() -> AuctionRepository {
        AuctionRepository::new(Arc::new(InMemoryAuctionStore::new()))
    }

    async fn status_of(repository: &AuctionRepository, id: &str) -> AuctionStatus {
        repository.find_auction_by_id(id).await.unwrap().status
    }

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn create_then_find_returns_same_auction() {
        let repository = repository();
        let auction = Auction::new("Lamp", "Home", "Brass desk lamp", ProductCondition::New);

        repository.create_auction(&auction).await.unwrap();
        let found = repository.find_auction_by_id(&auction.id).await.unwrap();

        assert_eq!(found.id, auction.id);
        assert_eq!(found.product_name, "Lamp");
        assert_eq!(found.status, AuctionStatus::Active);
    }

    #[tokio::test]
    async fn create_with_duplicate_id_is_a_storage_error() {
        let repository = repository();
        let auction = Auction::new("Lamp", "Home", "Brass desk lamp", ProductCondition::New);
        repository.create_auction(&auction).await.unwrap();

        let result = repository.create_auction(&auction).await;

        assert!(matches!(
            result,
            Err(AuctionError::Storage(StorageError::DuplicateId(_)))
        ));
    }

    #[tokio::test]
    async fn missing_auction_is_not_found() {
        let repository = repository();
        let result = repository.find_auction_by_id("missing").await;
        assert!(matches!(result, Err(AuctionError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn expire_respects_the_ttl_boundary() {
        let repository = repository();
        let now = Utc::now();
        let young = auction_aged(now, 299);
        let exact = auction_aged(now, 300);
        let old = auction_aged(now, 301);
        for auction in [&young, &exact, &old] {
            repository.create_auction(auction).await.unwrap();
        }

        let closed = repository.expire_overdue_at(now, TTL).await.unwrap();

        // 초 단위 저장이므로 정확히 ttl 인 경매는 아직 닫지 않는다
        assert_eq!(closed, 1);
        assert_eq!(status_of(&repository, &young.id).await, AuctionStatus::Active);
        assert_eq!(status_of(&repository, &exact.id).await, AuctionStatus::Active);
        assert_eq!(status_of(&repository, &old.id).await, AuctionStatus::Completed);
    }

    #[tokio::test]
    async fn auction_is_never_closed_before_its_ttl() {
        let repository = repository();
        // 1_000_000.1s
        let now = DateTime::from_timestamp(1_000_000, 100_000_000).unwrap();
        let almost = Auction {
            timestamp: now - chrono::Duration::milliseconds(299_200),
            ..auction_aged(now, 0)
        };
        let overdue = auction_aged(now, 301);
        repository.create_auction(&almost).await.unwrap();
        repository.create_auction(&overdue).await.unwrap();

        let closed = repository.expire_overdue_at(now, TTL).await.unwrap();

        assert_eq!(closed, 1);
        assert_eq!(status_of(&repository, &almost.id).await, AuctionStatus::Active);
        assert_eq!(status_of(&repository, &overdue.id).await, AuctionStatus::Completed);
    }

    #[tokio::test]
    async fn sub_second_ttl_does_not_close_a_new_auction() {
        let repository = repository();
        let config = ExpirationConfig::from_raw(None, Some("500ms"));
        let auction = Auction::new("Lamp", "Home", "Brass desk lamp", ProductCondition::New);
        repository.create_auction(&auction).await.unwrap();

        let closed = repository.expire_overdue(config.auction_interval).await.unwrap();

        assert_eq!(closed, 0);
        assert_eq!(status_of(&repository, &auction.id).await, AuctionStatus::Active);
    }

    #[tokio::test]
    async fn second_sweep_is_a_no_op() {
        let repository = repository();
        let now = Utc::now();
        repository.create_auction(&auction_aged(now, 600)).await.unwrap();
        repository.create_auction(&auction_aged(now, 900)).await.unwrap();

        assert_eq!(repository.expire_overdue_at(now, TTL).await.unwrap(), 2);
        assert_eq!(repository.expire_overdue_at(now, TTL).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn completed_auction_never_becomes_active_again() {
        let repository = repository();
        let now = Utc::now();
        let auction = auction_aged(now, 600);
        repository.create_auction(&auction).await.unwrap();
        repository.expire_overdue_at(now, TTL).await.unwrap();

        // 더 긴 ttl 로 다시 실행해도 되돌아가지 않는다
        repository
            .expire_overdue_at(now, Duration::from_secs(3600))
            .await
            .unwrap();

        let found = repository.find_auction_by_id(&auction.id).await.unwrap();
        assert_eq!(found.status, AuctionStatus::Completed);
    }

    #[tokio::test]
    async fn find_auctions_filters_by_status() {
        let repository = repository();
        let now = Utc::now();
        repository.create_auction(&auction_aged(now, 600)).await.unwrap();
        repository.create_auction(&auction_aged(now, 10)).await.unwrap();
        repository.expire_overdue_at(now, TTL).await.unwrap();

        let active = repository
            .find_auctions(AuctionFilter {
                status: Some(AuctionStatus::Active),
                ..AuctionFilter::default()
            })
            .await
            .unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].status, AuctionStatus::Active);
    }

    #[tokio::test]
    async fn expire_issues_one_conditional_update_with_the_cutoff() {
        let now = Utc::now();
        let expected_cutoff = now.timestamp() - 300;

        let mut store = MockAuctionStore::new();
        store
            .expect_update_many()
            .withf(move |filter, update| {
                *filter == AuctionFilter::overdue(expected_cutoff)
                    && *update == AuctionUpdate::complete()
            })
            .times(1)
            .returning(|_, _| Ok(3));

        let repository = AuctionRepository::new(Arc::new(store));
        assert_eq!(repository.expire_overdue_at(now, TTL).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn expire_surfaces_storage_errors() {
        let mut store = MockAuctionStore::new();
        store
            .expect_update_many()
            .returning(|_, _| Err(StorageError::Unavailable("connection refused".into())));

        let repository = AuctionRepository::new(Arc::new(store));
        let result = repository.expire_overdue(TTL).await;

        assert!(matches!(
            result,
            Err(AuctionError::Storage(StorageError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn create_surfaces_storage_errors() {
        let mut store = MockAuctionStore::new();
        store
            .expect_insert_one()
            .times(1)
            .returning(|_| Err(StorageError::Unavailable("connection refused".into())));

        let repository = AuctionRepository::new(Arc::new(store));
        let auction = Auction::new("Lamp", "Home", "Brass desk lamp", ProductCondition::New);

        assert!(repository.create_auction(&auction).await.is_err());
    }
}
