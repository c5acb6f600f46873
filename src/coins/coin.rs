//! A single coin: face plus lock flag

use crate::core::types::{CoinFace, Side};
use serde::{Deserialize, Serialize};

/// One coin in the set
///
/// A lock belongs to the side that placed it. Every automatic flip skips a
/// locked coin, but only the owner's next turn-start flip spends the lock;
/// it is released at the end of that turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    face: CoinFace,
    lock: Option<Side>,
    lock_spent: bool,
}

impl Default for Coin {
    fn default() -> Self {
        Self::new(CoinFace::Heads)
    }
}

impl Coin {
    pub fn new(face: CoinFace) -> Self {
        Self {
            face,
            lock: None,
            lock_spent: false,
        }
    }

    pub fn face(&self) -> CoinFace {
        self.face
    }

    pub fn is_heads(&self) -> bool {
        self.face.is_heads()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// Side holding the lock, if any
    pub fn locked_by(&self) -> Option<Side> {
        self.lock
    }

    /// Has the lock already protected its owner's flip?
    pub fn lock_spent(&self) -> bool {
        self.lock.is_some() && self.lock_spent
    }

    pub(crate) fn set_face(&mut self, face: CoinFace) {
        self.face = face;
    }

    pub(crate) fn invert(&mut self) -> CoinFace {
        self.face = self.face.flipped();
        self.face
    }

    pub(crate) fn lock(&mut self, owner: Side) {
        self.lock = Some(owner);
        self.lock_spent = false;
    }

    /// Record that `side`'s turn-start flip skipped this coin
    pub(crate) fn consume_lock(&mut self, side: Side) {
        if self.lock == Some(side) {
            self.lock_spent = true;
        }
    }

    /// Clear the lock if it has already protected its owner's flip.
    /// Returns true if cleared.
    pub(crate) fn release_if_spent(&mut self) -> bool {
        if self.lock.is_some() && self.lock_spent {
            self.lock = None;
            self.lock_spent = false;
            true
        } else {
            false
        }
    }
}
