//! Coin state: flips, locks, swaps and snapshots

pub mod coin;
pub mod coin_set;

pub use coin::Coin;
pub use coin_set::CoinSet;
