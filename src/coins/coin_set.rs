//! Ordered set of coins flipped each turn
//!
//! Order is significant: patterns are positional and runs are contiguous.
//! The set never changes length except through [`CoinSet::resize`].

use crate::coins::coin::Coin;
use crate::core::config::{SwapPolicy, MAX_COINS};
use crate::core::error::{CombatError, Result};
use crate::core::types::{CoinFace, Side};
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSet {
    coins: Vec<Coin>,
    swap_policy: SwapPolicy,
}

impl CoinSet {
    /// Create `count` unlocked coins, all heads
    pub fn new(count: usize, swap_policy: SwapPolicy) -> Result<Self> {
        check_count(count)?;
        Ok(Self {
            coins: vec![Coin::default(); count],
            swap_policy,
        })
    }

    /// Create a set with explicit faces (`true` = heads)
    pub fn from_faces(faces: &[bool], swap_policy: SwapPolicy) -> Result<Self> {
        check_count(faces.len())?;
        Ok(Self {
            coins: faces
                .iter()
                .map(|&heads| Coin::new(CoinFace::from_bool(heads)))
                .collect(),
            swap_policy,
        })
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn swap_policy(&self) -> SwapPolicy {
        self.swap_policy
    }

    pub fn get(&self, index: usize) -> Option<&Coin> {
        self.coins.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.coins.iter()
    }

    pub fn is_locked(&self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        Ok(self.coins[index].is_locked())
    }

    pub fn locked_indices(&self) -> Vec<usize> {
        self.coins
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_locked())
            .map(|(i, _)| i)
            .collect()
    }

    /// Current faces in order, heads = true
    ///
    /// This is the only view of the set the matcher consumes.
    pub fn snapshot(&self) -> Vec<bool> {
        self.coins.iter().map(Coin::is_heads).collect()
    }

    /// Give every unlocked coin an independent 50/50 face
    ///
    /// Locked coins keep their face and their locks are left as they are.
    /// Returns the number of coins that were thrown.
    pub fn flip_all<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut thrown = 0;
        for coin in self.coins.iter_mut().filter(|c| !c.is_locked()) {
            coin.set_face(CoinFace::from_bool(rng.gen::<bool>()));
            thrown += 1;
        }
        thrown
    }

    /// The flip that starts `side`'s turn
    ///
    /// Same as [`CoinSet::flip_all`], and additionally marks `side`'s own
    /// locks spent: they have protected the flip they were placed for and are
    /// released by [`CoinSet::release_spent_locks`] at the end of the turn.
    /// Locks held by the other side are untouched.
    pub fn flip_for_turn<R: Rng + ?Sized>(&mut self, side: Side, rng: &mut R) -> usize {
        let thrown = self.flip_all(rng);
        for coin in &mut self.coins {
            coin.consume_lock(side);
        }
        thrown
    }

    /// Invert one coin, regardless of its lock
    pub fn flip_one(&mut self, index: usize) -> Result<CoinFace> {
        self.check_index(index)?;
        Ok(self.coins[index].invert())
    }

    /// Protect a coin until `owner`'s next turn-start flip has happened
    pub fn lock(&mut self, index: usize, owner: Side) -> Result<()> {
        self.check_index(index)?;
        self.coins[index].lock(owner);
        Ok(())
    }

    /// Exchange face and lock state of two coins
    pub fn swap(&mut self, first: usize, second: usize) -> Result<()> {
        self.check_index(first)?;
        self.check_index(second)?;
        if first == second {
            return Ok(());
        }

        if self.swap_policy == SwapPolicy::DenyLocked
            && (self.coins[first].is_locked() || self.coins[second].is_locked())
        {
            return Err(CombatError::illegal(format!(
                "cannot swap locked coins ({} <-> {})",
                first, second
            )));
        }

        self.coins.swap(first, second);
        Ok(())
    }

    /// Reinitialize to `new_count` unlocked coins, then flip them all
    pub fn resize<R: Rng + ?Sized>(&mut self, new_count: usize, rng: &mut R) -> Result<()> {
        check_count(new_count)?;
        self.coins = vec![Coin::default(); new_count];
        self.flip_all(rng);
        Ok(())
    }

    /// Release locks that have already protected their owner's flip. Returns how many.
    pub fn release_spent_locks(&mut self) -> usize {
        self.coins
            .iter_mut()
            .map(Coin::release_if_spent)
            .filter(|&released| released)
            .count()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.coins.len() {
            return Err(CombatError::OutOfRange {
                index,
                count: self.coins.len(),
            });
        }
        Ok(())
    }
}

fn check_count(count: usize) -> Result<()> {
    if count == 0 || count > MAX_COINS {
        return Err(CombatError::config(format!(
            "coin count must be between 1 and {} (got {})",
            MAX_COINS, count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn set(faces: &[bool]) -> CoinSet {
        CoinSet::from_faces(faces, SwapPolicy::DenyLocked).unwrap()
    }

    #[test]
    fn test_new_set_is_unlocked() {
        let coins = CoinSet::new(5, SwapPolicy::DenyLocked).unwrap();
        assert_eq!(coins.len(), 5);
        assert!(coins.locked_indices().is_empty());
    }

    #[test]
    fn test_zero_coins_rejected() {
        let err = CoinSet::new(0, SwapPolicy::DenyLocked).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
    }

    #[test]
    fn test_locked_coin_survives_flip() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut coins = set(&[true, true, false, true, true]);
        coins.lock(2, Side::Player).unwrap();

        for _ in 0..32 {
            // Relock each round so every flip is protected
            coins.lock(2, Side::Player).unwrap();
            coins.flip_all(&mut rng);
            assert!(!coins.snapshot()[2]);
        }
    }

    #[test]
    fn test_lock_released_after_owner_flip() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut coins = set(&[true; 5]);
        coins.lock(1, Side::Player).unwrap();

        // Lock set but no flip yet: end of turn leaves it in place
        assert_eq!(coins.release_spent_locks(), 0);
        assert!(coins.is_locked(1).unwrap());

        // The opponent's throw skips the coin without spending the lock
        assert_eq!(coins.flip_for_turn(Side::Enemy, &mut rng), 4);
        assert_eq!(coins.release_spent_locks(), 0);
        assert!(coins.is_locked(1).unwrap());

        assert_eq!(coins.flip_for_turn(Side::Player, &mut rng), 4);
        // Still locked until the owner's turn ends
        assert!(coins.is_locked(1).unwrap());

        assert_eq!(coins.release_spent_locks(), 1);
        assert!(!coins.is_locked(1).unwrap());
        assert!(coins.snapshot()[1]);
    }

    #[test]
    fn test_plain_flip_does_not_spend_locks() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut coins = set(&[false; 3]);
        coins.lock(2, Side::Player).unwrap();
        coins.flip_all(&mut rng);
        assert_eq!(coins.release_spent_locks(), 0);
        assert_eq!(coins.get(2).and_then(|c| c.locked_by()), Some(Side::Player));
    }

    #[test]
    fn test_flip_one_inverts_locked_coin() {
        let mut coins = set(&[true, false, true]);
        coins.lock(0, Side::Player).unwrap();
        assert_eq!(coins.flip_one(0).unwrap(), CoinFace::Tails);
        assert_eq!(coins.snapshot(), vec![false, false, true]);
        assert!(coins.is_locked(0).unwrap());
    }

    #[test]
    fn test_out_of_range_has_no_effect() {
        let mut coins = set(&[true, false, true]);
        let before = coins.clone();

        assert_eq!(coins.flip_one(3).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(coins.lock(9, Side::Player).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(coins.swap(0, 3).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(coins, before);
    }

    #[test]
    fn test_swap_moves_face_and_lock() {
        let mut coins = CoinSet::from_faces(&[true, false], SwapPolicy::AllowLocked).unwrap();
        coins.lock(0, Side::Player).unwrap();
        coins.swap(0, 1).unwrap();
        assert_eq!(coins.snapshot(), vec![false, true]);
        assert!(!coins.is_locked(0).unwrap());
        assert!(coins.is_locked(1).unwrap());
    }

    #[test]
    fn test_swap_locked_denied_by_default() {
        let mut coins = set(&[true, false]);
        coins.lock(1, Side::Player).unwrap();
        let err = coins.swap(0, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalAction);
        assert_eq!(coins.snapshot(), vec![true, false]);
    }

    #[test]
    fn test_swap_same_index_is_noop() {
        let mut coins = set(&[true, false]);
        coins.lock(0, Side::Player).unwrap();
        coins.swap(0, 0).unwrap();
        assert_eq!(coins.snapshot(), vec![true, false]);
    }

    #[test]
    fn test_resize_unlocks_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut coins = set(&[true, true, true]);
        coins.lock(0, Side::Player).unwrap();
        coins.resize(7, &mut rng).unwrap();
        assert_eq!(coins.len(), 7);
        assert!(coins.locked_indices().is_empty());
    }

    #[test]
    fn test_resize_rejects_zero_and_keeps_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut coins = set(&[true, false, true]);
        assert!(coins.resize(0, &mut rng).is_err());
        assert_eq!(coins.snapshot(), vec![true, false, true]);
    }

    #[test]
    fn test_seeded_flips_are_reproducible() {
        let mut a = CoinSet::new(5, SwapPolicy::DenyLocked).unwrap();
        let mut b = a.clone();
        let mut rng_a = ChaCha8Rng::seed_from_u64(99);
        let mut rng_b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..10 {
            a.flip_all(&mut rng_a);
            b.flip_all(&mut rng_b);
            assert_eq!(a.snapshot(), b.snapshot());
        }
    }

    proptest! {
        #[test]
        fn prop_locked_coins_never_change_on_flip(
            faces in prop::collection::vec(any::<bool>(), 1..=MAX_COINS),
            lock_mask in prop::collection::vec(any::<bool>(), MAX_COINS),
            seed in any::<u64>(),
        ) {
            let mut coins = CoinSet::from_faces(&faces, SwapPolicy::DenyLocked).unwrap();
            for (i, &lock) in lock_mask.iter().take(faces.len()).enumerate() {
                if lock {
                    coins.lock(i, Side::Player).unwrap();
                }
            }
            let before = coins.snapshot();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            coins.flip_all(&mut rng);
            let after = coins.snapshot();

            for (i, &lock) in lock_mask.iter().take(faces.len()).enumerate() {
                if lock {
                    prop_assert_eq!(before[i], after[i]);
                }
            }
            prop_assert_eq!(after.len(), faces.len());
        }
    }
}
