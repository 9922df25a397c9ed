pub mod model;

pub use model::{expiration_cutoff, Auction, AuctionStatus, ProductCondition};
