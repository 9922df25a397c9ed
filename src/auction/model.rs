use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

// region:    --- Auction Status
/// 경매 상태
/// Active -> Completed 단방향으로만 전이된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Active,
    Completed,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Active => "active",
            AuctionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AuctionStatus::Active),
            "completed" => Ok(AuctionStatus::Completed),
            other => Err(format!("알 수 없는 경매 상태: {}", other)),
        }
    }
}
// endregion: --- Auction Status

// region:    --- Product Condition
/// 상품 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCondition {
    New,
    Used,
}

impl ProductCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCondition::New => "new",
            ProductCondition::Used => "used",
        }
    }
}

impl FromStr for ProductCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ProductCondition::New),
            "used" => Ok(ProductCondition::Used),
            other => Err(format!("알 수 없는 상품 상태: {}", other)),
        }
    }
}
// endregion: --- Product Condition

// region:    --- Auction
/// 경매 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auction {
    pub id: String,
    pub product_name: String,
    pub category: String,
    pub description: String,
    pub condition: ProductCondition,
    pub status: AuctionStatus,
    pub timestamp: DateTime<Utc>,
}

impl Auction {
    /// 새 경매 생성 (Active 상태, 현재 시각)
    pub fn new(
        product_name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        condition: ProductCondition,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_name: product_name.into(),
            category: category.into(),
            description: description.into(),
            condition,
            status: AuctionStatus::Active,
            timestamp: Utc::now(),
        }
    }
}
// endregion: --- Auction

/// 만료 기준 시각 (epoch seconds)
/// now - ttl 을 정밀하게 계산한 뒤 초 단위로 내림한다.
/// 저장된 timestamp 가 이 값보다 작으면 (strict) 생성 후 ttl 이 지난 경매다.
pub fn expiration_cutoff(now: DateTime<Utc>, ttl: Duration) -> i64 {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_sub_signed(ttl))
        .map_or(i64::MIN, |cutoff| cutoff.timestamp())
}
