// region:    --- Imports
use crate::auction::{Auction, AuctionStatus, ProductCondition};
use crate::repository::AuctionRepository;
use crate::store::AuctionFilter;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

// region:    --- Requests
/// 경매 생성 요청
#[derive(Debug, Deserialize)]
pub struct CreateAuctionInput {
    pub product_name: String,
    pub category: String,
    pub description: String,
    pub condition: ProductCondition,
}

/// 경매 목록 조회 조건
#[derive(Debug, Default, Deserialize)]
pub struct FindAuctionsQuery {
    pub status: Option<AuctionStatus>,
    pub category: Option<String>,
    pub product_name: Option<String>,
}

impl From<FindAuctionsQuery> for AuctionFilter {
    fn from(query: FindAuctionsQuery) -> Self {
        AuctionFilter {
            status: query.status,
            category: query.category.filter(|c| !c.is_empty()),
            product_name: query.product_name.filter(|n| !n.is_empty()),
            ..AuctionFilter::default()
        }
    }
}
// endregion: --- Requests

// region:    --- Router
/// 라우터 생성
pub fn create_router(repository: Arc<AuctionRepository>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/auction",
            get(handle_find_auctions).post(handle_create_auction),
        )
        .route("/auction/:id", get(handle_find_auction))
        .layer(cors)
        .with_state(repository)
}
// endregion: --- Router

// region:    --- Command Handlers

/// 경매 생성 요청 처리
pub async fn handle_create_auction(
    State(repository): State<Arc<AuctionRepository>>,
    Json(input): Json<CreateAuctionInput>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 생성 요청: {:?}", "Command", input);

    let auction = Auction::new(
        input.product_name,
        input.category,
        input.description,
        input.condition,
    );

    match repository.create_auction(&auction).await {
        Ok(()) => (StatusCode::CREATED, Json(auction)).into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 조회
pub async fn handle_find_auction(
    State(repository): State<Arc<AuctionRepository>>,
    Path(auction_id): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", auction_id);
    match repository.find_auction_by_id(&auction_id).await {
        Ok(auction) => Json(auction).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 경매 목록 조회
pub async fn handle_find_auctions(
    State(repository): State<Arc<AuctionRepository>>,
    Query(query): Query<FindAuctionsQuery>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 목록 조회: {:?}", "HandlerQuery", query);
    match repository.find_auctions(query.into()).await {
        Ok(auctions) => Json(auctions).into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Query Handlers
