//! Pattern matching over coin snapshots
//!
//! Stateless. Coins are read as `true` = heads. Contiguity follows array order
//! with no wraparound. No ranking is done here: the caller picks among the
//! satisfied patterns.

use crate::patterns::pattern::{Pattern, PatternShape};
use std::ops::Range;

/// Length of the longest contiguous run of coins equal to `value`
pub fn longest_run(coins: &[bool], value: bool) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &coin in coins {
        if coin == value {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// First window of `length` consecutive coins equal to `value`
pub fn first_run_window(coins: &[bool], value: bool, length: usize) -> Option<Range<usize>> {
    if length == 0 {
        return None;
    }
    let mut current = 0;
    for (i, &coin) in coins.iter().enumerate() {
        if coin == value {
            current += 1;
            if current == length {
                return Some(i + 1 - length..i + 1);
            }
        } else {
            current = 0;
        }
    }
    None
}

pub fn is_all_same(coins: &[bool], value: bool) -> bool {
    !coins.is_empty() && coins.iter().all(|&c| c == value)
}

/// Every adjacent pair differs; needs at least two coins
pub fn is_alternating(coins: &[bool]) -> bool {
    coins.len() >= 2 && coins.windows(2).all(|pair| pair[0] != pair[1])
}

/// Does the snapshot satisfy this pattern?
pub fn is_satisfied(coins: &[bool], pattern: &Pattern) -> bool {
    let value = pattern.face.is_heads();
    match pattern.shape {
        PatternShape::Run { length } => length > 0 && longest_run(coins, value) >= length,
        PatternShape::AllSame => is_all_same(coins, value),
        PatternShape::Alternating => is_alternating(coins),
    }
}

/// The satisfied subset of `catalog`, in catalog order
pub fn determine<'a>(coins: &[bool], catalog: &'a [Pattern]) -> Vec<&'a Pattern> {
    catalog.iter().filter(|p| is_satisfied(coins, p)).collect()
}

/// Coin positions that justify a match, for highlighting
///
/// Runs report their first qualifying window; all-same and alternating report
/// every index. Empty when the pattern does not match.
pub fn locate_indices(coins: &[bool], pattern: &Pattern) -> Vec<usize> {
    if !is_satisfied(coins, pattern) {
        return Vec::new();
    }
    match pattern.shape {
        PatternShape::Run { length } => first_run_window(coins, pattern.face.is_heads(), length)
            .map(|window| window.collect())
            .unwrap_or_default(),
        PatternShape::AllSame | PatternShape::Alternating => (0..coins.len()).collect(),
    }
}
