/// 경매 만료 스케줄러
/// 주기적으로 리포지토리의 만료 처리를 호출하고, 취소 신호를 받으면 종료한다.
/// 한 번 종료된 스케줄러는 다시 시작할 수 없다.
// region:    --- Imports
use crate::config::ExpirationConfig;
use crate::repository::AuctionRepository;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Scheduler State
const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

impl From<u8> for SchedulerState {
    fn from(value: u8) -> Self {
        match value {
            IDLE => SchedulerState::Idle,
            RUNNING => SchedulerState::Running,
            _ => SchedulerState::Stopped,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyRunning,

    #[error("scheduler has stopped and cannot be restarted")]
    Stopped,

    #[error("check interval must be greater than zero")]
    ZeroCheckInterval,
}
// endregion: --- Scheduler State

// region:    --- Auction Scheduler
/// 경매 만료 스케줄러
pub struct AuctionScheduler {
    repository: Arc<AuctionRepository>,
    state: Arc<AtomicU8>,
}

impl AuctionScheduler {
    pub fn new(repository: Arc<AuctionRepository>) -> Self {
        Self {
            repository,
            state: Arc::new(AtomicU8::new(IDLE)),
        }
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState::from(self.state.load(Ordering::Acquire))
    }

    /// 경매 만료 스케줄러 시작
    /// 즉시 반환하며, 만료 처리는 별도 태스크에서 check_interval 마다 실행된다.
    pub fn start(
        &self,
        config: &ExpirationConfig,
        shutdown: CancellationToken,
    ) -> Result<JoinHandle<()>, SchedulerError> {
        if config.check_interval.is_zero() {
            return Err(SchedulerError::ZeroCheckInterval);
        }
        self.state
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|current| match SchedulerState::from(current) {
                SchedulerState::Running => SchedulerError::AlreadyRunning,
                _ => SchedulerError::Stopped,
            })?;

        let check_interval = config.check_interval;
        let auction_interval = config.auction_interval;
        let repository = Arc::clone(&self.repository);
        let state = Arc::clone(&self.state);

        let handle = tokio::spawn(async move {
            // 첫 실행은 check_interval 이후
            let mut interval = interval_at(Instant::now() + check_interval, check_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        info!("{:<12} --> 경매 만료 스케줄러 종료", "Scheduler");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = repository.expire_overdue(auction_interval).await {
                            error!(
                                "{:<12} --> 경매 만료 처리 중 오류 발생: {:?}",
                                "Scheduler", e
                            );
                        }
                    }
                }
            }

            state.store(STOPPED, Ordering::Release);
        });

        info!(
            "{:<12} --> 경매 만료 스케줄러 시작 - check_interval: {:?}, auction_interval: {:?}",
            "Scheduler", check_interval, auction_interval
        );
        Ok(handle)
    }
}
// endregion: --- Auction Scheduler
