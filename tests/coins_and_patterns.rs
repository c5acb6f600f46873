//! Coin, matcher and resolver behavior through the public API

use coin_combat::coins::CoinSet;
use coin_combat::combat::{Character, CombatEvent, CombatEventLog, Fighter};
use coin_combat::core::{CoinFace, ErrorKind, Side, SwapPolicy};
use coin_combat::effects::{EffectResolver, Participant};
use coin_combat::patterns::{determine, locate_indices, DefaultStacking, Pattern, PatternShape};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const H: bool = true;
const T: bool = false;

fn ids(matched: &[&Pattern]) -> Vec<String> {
    matched.iter().map(|p| p.id.to_string()).collect()
}

#[test]
fn test_runs_of_heads_and_tails() {
    let coins = [H, H, H, T, T];
    let catalog = vec![
        Pattern::attack("three_heads", PatternShape::Run { length: 3 }, CoinFace::Heads, 2),
        Pattern::defense("two_tails", PatternShape::Run { length: 2 }, CoinFace::Tails, 2),
        Pattern::attack("four_heads", PatternShape::Run { length: 4 }, CoinFace::Heads, 5),
    ];

    let matched = determine(&coins, &catalog);
    assert_eq!(ids(&matched), vec!["three_heads", "two_tails"]);

    assert_eq!(locate_indices(&coins, &catalog[0]), vec![0, 1, 2]);
    assert_eq!(locate_indices(&coins, &catalog[1]), vec![3, 4]);
    assert!(locate_indices(&coins, &catalog[2]).is_empty());
}

#[test]
fn test_alternating_excludes_all_same() {
    let coins = [H, T, H, T, H];
    let catalog = vec![
        Pattern::attack("all_heads", PatternShape::AllSame, CoinFace::Heads, 8),
        Pattern::attack("zigzag", PatternShape::Alternating, CoinFace::Heads, 3),
        Pattern::defense("all_tails", PatternShape::AllSame, CoinFace::Tails, 8),
    ];

    assert_eq!(ids(&determine(&coins, &catalog)), vec!["zigzag"]);
}

/// A sequence with a repeated pair in an odd position is not alternating
#[test]
fn test_alternating_rejects_late_repeat() {
    let catalog = vec![Pattern::attack(
        "zigzag",
        PatternShape::Alternating,
        CoinFace::Heads,
        3,
    )];
    assert!(determine(&[H, T, H, H, T], &catalog).is_empty());
    assert!(determine(&[H, T, T, H, T], &catalog).is_empty());
    assert_eq!(determine(&[T, H, T, H], &catalog).len(), 1);
}

#[test]
fn test_runs_do_not_wrap() {
    let catalog = vec![Pattern::attack(
        "three_heads",
        PatternShape::Run { length: 3 },
        CoinFace::Heads,
        2,
    )];
    assert!(determine(&[H, T, T, H, H], &catalog).is_empty());
}

#[test]
fn test_locked_coin_survives_flip() {
    for seed in 0..32 {
        let mut coins = CoinSet::from_faces(&[H, H, T, H, H], SwapPolicy::DenyLocked).unwrap();
        coins.lock(2, Side::Player).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let thrown = coins.flip_all(&mut rng);

        assert_eq!(thrown, 4);
        assert!(!coins.snapshot()[2], "seed {} changed the locked coin", seed);
    }
}

#[test]
fn test_lock_expires_after_owners_flip() {
    let mut coins = CoinSet::from_faces(&[T, T, T], SwapPolicy::DenyLocked).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    coins.lock(1, Side::Player).unwrap();
    coins.flip_for_turn(Side::Enemy, &mut rng);
    assert_eq!(coins.release_spent_locks(), 0);

    coins.flip_for_turn(Side::Player, &mut rng);
    assert_eq!(coins.locked_indices(), vec![1]);

    assert_eq!(coins.release_spent_locks(), 1);
    assert!(coins.locked_indices().is_empty());
}

#[test]
fn test_swap_policy() {
    let mut deny = CoinSet::from_faces(&[H, T, T], SwapPolicy::DenyLocked).unwrap();
    deny.lock(0, Side::Player).unwrap();
    let err = deny.swap(0, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalAction);
    assert_eq!(deny.snapshot(), vec![H, T, T]);

    let mut allow = CoinSet::from_faces(&[H, T, T], SwapPolicy::AllowLocked).unwrap();
    allow.lock(0, Side::Player).unwrap();
    allow.swap(0, 1).unwrap();
    assert_eq!(allow.snapshot(), vec![T, H, T]);
    assert_eq!(allow.locked_indices(), vec![1]);
}

#[test]
fn test_out_of_range_index() {
    let mut coins = CoinSet::new(5, SwapPolicy::DenyLocked).unwrap();
    assert_eq!(coins.flip_one(5).unwrap_err().kind(), ErrorKind::OutOfRange);
    assert_eq!(coins.lock(9, Side::Player).unwrap_err().kind(), ErrorKind::OutOfRange);
    assert_eq!(coins.swap(0, 5).unwrap_err().kind(), ErrorKind::OutOfRange);
    assert_eq!(coins.snapshot(), vec![H; 5]);
}

#[test]
fn test_attack_damage_event() {
    let mut attacker = Fighter::new("hero", "knight", 30, 10);
    let mut defender = Fighter::new("slime", "slime", 15, 3);
    let pattern = Pattern::attack("strike", PatternShape::Run { length: 2 }, CoinFace::Heads, 2);
    let mut events = CombatEventLog::new();

    EffectResolver::new(&DefaultStacking)
        .apply(
            Some(&pattern),
            Some(Participant::new(Side::Player, &mut attacker)),
            Some(Participant::new(Side::Enemy, &mut defender)),
            &mut events,
        )
        .unwrap();

    assert_eq!(defender.current_health(), 3);
    assert_eq!(
        events.drain(),
        vec![CombatEvent::DamageApplied {
            target: Side::Enemy,
            amount: 12
        }]
    );
}

#[test]
fn test_health_floors_at_zero() {
    let mut attacker = Fighter::new("hero", "knight", 30, 10);
    let mut defender = Fighter::new("slime", "slime", 15, 3).with_health(5);
    let pattern = Pattern::attack("strike", PatternShape::Run { length: 2 }, CoinFace::Heads, 2);
    let mut events = CombatEventLog::new();

    let resolution = EffectResolver::new(&DefaultStacking)
        .apply(
            Some(&pattern),
            Some(Participant::new(Side::Player, &mut attacker)),
            Some(Participant::new(Side::Enemy, &mut defender)),
            &mut events,
        )
        .unwrap();

    assert_eq!(defender.current_health(), 0);
    assert!(defender.is_defeated());
    assert_eq!(resolution.damage, 5);
}
