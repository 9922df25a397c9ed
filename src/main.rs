// region:    --- Imports
use auction_lifecycle::database::DatabaseManager;
use auction_lifecycle::handlers::create_router;
use auction_lifecycle::{
    AuctionRepository, AuctionScheduler, AuctionStore, Config, InMemoryAuctionStore,
    PostgresAuctionStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .with_target(false)
        .init();

    // 설정은 시작 시 한 번만 읽는다
    let config = Config::from_env();
    info!("{:<12} --> 설정 로드: {:?}", "Main", config.expiration);

    // 저장소 선택
    let store: Arc<dyn AuctionStore> = match &config.database_url {
        Some(database_url) => {
            let db_manager = DatabaseManager::connect(database_url, config.max_connections)
                .await
                .map_err(|e| {
                    error!("{:<12} --> 데이터베이스 연결 실패: {:?}", "Main", e);
                    e
                })?;
            if let Err(e) = db_manager.initialize_database().await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresAuctionStore::new(db_manager.get_pool()))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 미설정, 메모리 저장소를 사용합니다",
                "Main"
            );
            Arc::new(InMemoryAuctionStore::new())
        }
    };

    let repository = Arc::new(AuctionRepository::new(store));

    // 경매 만료 스케줄러 시작
    let shutdown = CancellationToken::new();
    let scheduler = AuctionScheduler::new(Arc::clone(&repository));
    let scheduler_handle = scheduler.start(&config.expiration, shutdown.clone())?;

    // 라우터 설정
    let routes_all = create_router(repository);

    // 리스너 생성
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = TcpListener::bind(addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
    {
        error!("{:<12} --> Server error: {}", "Main", err);
    }

    // 서버가 먼저 종료된 경우에도 스케줄러를 멈춘다
    shutdown.cancel();
    scheduler_handle.await?;
    info!("{:<12} --> 종료 완료", "Main");
    Ok(())
}
// endregion: --- Main

/// Ctrl+C 또는 SIGTERM 대기 후 취소 신호 전파
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("{:<12} --> Ctrl+C 핸들러 등록 실패: {:?}", "Main", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("{:<12} --> SIGTERM 핸들러 등록 실패: {:?}", "Main", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = shutdown.cancelled() => {}
    }

    info!("{:<12} --> 종료 신호 수신", "Main");
    shutdown.cancel();
}
