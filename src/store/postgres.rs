// region:    --- Imports
use super::{AuctionFilter, AuctionRecord, AuctionStore, AuctionUpdate, StorageError};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
// endregion: --- Imports

const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (id, product_name, category, description, condition, status, "timestamp")
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

const SELECT_AUCTION: &str = r#"SELECT id, product_name, category, description, condition, status, "timestamp" FROM auctions"#;

// region:    --- Query Builders
/// 필터 조건을 WHERE 절로 추가
fn push_filter<'args>(builder: &mut QueryBuilder<'args, Postgres>, filter: &AuctionFilter) {
    builder.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(cutoff) = filter.created_before {
        builder.push(r#" AND "timestamp" < "#).push_bind(cutoff);
    }
    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(product_name) = &filter.product_name {
        builder
            .push(" AND product_name LIKE ")
            .push_bind(like_pattern(product_name))
            .push(r" ESCAPE '\'");
    }
}

/// 부분 일치 LIKE 패턴 (와일드카드 문자는 이스케이프)
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_");
    format!("%{}%", escaped)
}

/// 단일 UPDATE 문이므로 원자적으로 적용된다
fn update_many_query(filter: &AuctionFilter, update: AuctionUpdate) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE auctions SET status = ");
    builder.push_bind(update.status.as_str());
    push_filter(&mut builder, filter);
    builder.push(" AND status <> ").push_bind(update.status.as_str());
    builder
}

fn find_one_query(id: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_AUCTION);
    builder.push(" WHERE id = ").push_bind(id.to_string());
    builder
}

fn find_many_query(filter: &AuctionFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_AUCTION);
    push_filter(&mut builder, filter);
    builder.push(r#" ORDER BY "timestamp", id"#);
    builder
}
// endregion: --- Query Builders

// region:    --- Error Mapping
/// 연결 관련 오류는 Unavailable 로 구분한다
fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::Unavailable(err.to_string())
        }
        err => StorageError::Database(err),
    }
}

fn map_insert_error(err: sqlx::Error, id: &str) -> StorageError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StorageError::DuplicateId(id.to_string())
        }
        _ => map_sqlx_error(err),
    }
}
// endregion: --- Error Mapping

// region:    --- Postgres Auction Store
/// Postgres 경매 저장소
pub struct PostgresAuctionStore {
    pool: Arc<PgPool>,
}

impl PostgresAuctionStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuctionStore for PostgresAuctionStore {
    async fn insert_one(&self, record: AuctionRecord) -> Result<(), StorageError> {
        sqlx::query(INSERT_AUCTION)
            .bind(&record.id)
            .bind(&record.product_name)
            .bind(&record.category)
            .bind(&record.description)
            .bind(&record.condition)
            .bind(&record.status)
            .bind(record.timestamp)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_insert_error(e, &record.id))?;
        Ok(())
    }

    async fn update_many(
        &self,
        filter: AuctionFilter,
        update: AuctionUpdate,
    ) -> Result<u64, StorageError> {
        let result = update_many_query(&filter, update)
            .build()
            .execute(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn find_one(&self, id: &str) -> Result<Option<AuctionRecord>, StorageError> {
        find_one_query(id)
            .build_query_as::<AuctionRecord>()
            .fetch_optional(&*self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_many(&self, filter: AuctionFilter) -> Result<Vec<AuctionRecord>, StorageError> {
        find_many_query(&filter)
            .build_query_as::<AuctionRecord>()
            .fetch_all(&*self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
// endregion: --- Postgres Auction Store
