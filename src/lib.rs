pub mod auction;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod scheduler;
pub mod store;

pub use config::{Config, ExpirationConfig};
pub use error::AuctionError;
pub use repository::AuctionRepository;
pub use scheduler::{AuctionScheduler, SchedulerError, SchedulerState};
pub use store::{AuctionStore, InMemoryAuctionStore, PostgresAuctionStore, StorageError};
