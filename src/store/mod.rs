// region:    --- Imports
use crate::auction::{Auction, AuctionStatus};
use async_trait::async_trait;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

mod memory;
mod postgres;

pub use memory::InMemoryAuctionStore;
pub use postgres::PostgresAuctionStore;
// endregion: --- Imports

// region:    --- Storage Error
/// 저장소 오류
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("auction already exists: {0}")]
    DuplicateId(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt auction record: {0}")]
    CorruptRecord(String),
}
// endregion: --- Storage Error

// region:    --- Auction Record
/// 저장소에 저장되는 경매 레코드
/// condition, status 는 소문자 문자열, timestamp 는 epoch seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuctionRecord {
    pub id: String,
    pub product_name: String,
    pub category: String,
    pub description: String,
    pub condition: String,
    pub status: String,
    pub timestamp: i64,
}

impl From<&Auction> for AuctionRecord {
    fn from(auction: &Auction) -> Self {
        Self {
            id: auction.id.clone(),
            product_name: auction.product_name.clone(),
            category: auction.category.clone(),
            description: auction.description.clone(),
            condition: auction.condition.as_str().to_string(),
            status: auction.status.as_str().to_string(),
            timestamp: auction.timestamp.timestamp(),
        }
    }
}

impl TryFrom<AuctionRecord> for Auction {
    type Error = StorageError;

    fn try_from(record: AuctionRecord) -> Result<Self, Self::Error> {
        let condition = record.condition.parse().map_err(StorageError::CorruptRecord)?;
        let status = record.status.parse().map_err(StorageError::CorruptRecord)?;
        let timestamp = DateTime::from_timestamp(record.timestamp, 0).ok_or_else(|| {
            StorageError::CorruptRecord(format!(
                "timestamp out of range for {}: {}",
                record.id, record.timestamp
            ))
        })?;

        Ok(Auction {
            id: record.id,
            product_name: record.product_name,
            category: record.category,
            description: record.description,
            condition,
            status,
            timestamp,
        })
    }
}
// endregion: --- Auction Record

// region:    --- Filter / Update
/// 조건부 조회/갱신 필터
/// 지정된 조건은 모두 AND 로 결합된다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuctionFilter {
    pub status: Option<AuctionStatus>,
    /// timestamp < created_before (strict)
    pub created_before: Option<i64>,
    pub category: Option<String>,
    /// 상품명 부분 일치
    pub product_name: Option<String>,
}

impl AuctionFilter {
    /// 만료 대상 경매 필터 (Active 이고 cutoff 보다 먼저 생성됨)
    /// cutoff 는 expiration_cutoff 로 계산한 값이어야 한다.
    pub fn overdue(cutoff: i64) -> Self {
        Self {
            status: Some(AuctionStatus::Active),
            created_before: Some(cutoff),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &AuctionRecord) -> bool {
        self.status.map_or(true, |status| record.status == status.as_str())
            && self
                .created_before
                .map_or(true, |cutoff| record.timestamp < cutoff)
            && self
                .category
                .as_deref()
                .map_or(true, |category| record.category == category)
            && self
                .product_name
                .as_deref()
                .map_or(true, |name| record.product_name.contains(name))
    }
}

/// 일괄 갱신 내용
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuctionUpdate {
    pub status: AuctionStatus,
}

impl AuctionUpdate {
    pub fn complete() -> Self {
        Self {
            status: AuctionStatus::Completed,
        }
    }
}
// endregion: --- Filter / Update

// region:    --- Auction Store Trait
/// 경매 저장소 트레이트
/// update_many 는 단일 요청으로 원자적으로 적용되어야 한다.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuctionStore: Send + Sync {
    async fn insert_one(&self, record: AuctionRecord) -> Result<(), StorageError>;

    /// 갱신된 레코드 수 반환
    async fn update_many(
        &self,
        filter: AuctionFilter,
        update: AuctionUpdate,
    ) -> Result<u64, StorageError>;

    async fn find_one(&self, id: &str) -> Result<Option<AuctionRecord>, StorageError>;

    /// timestamp, id 순 정렬
    async fn find_many(&self, filter: AuctionFilter) -> Result<Vec<AuctionRecord>, StorageError>;
}
// endregion: --- Auction Store Trait
