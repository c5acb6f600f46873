pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, CombatConfig, SwapPolicy, DEFAULT_COIN_COUNT, MAX_COINS};
pub use error::{CombatError, ErrorKind, Result};
pub use types::{CoinFace, PatternId, Role, SessionId, Side, TurnNumber};
