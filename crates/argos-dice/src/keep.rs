// ABOUTME: Keep-highest / keep-lowest selection over rolled dice.
// ABOUTME: Marks which positions count toward a roll's total.

use crate::ast::Keep;
use std::cmp::Reverse;

/// Decide which of `values` are kept, in original roll order.
///
/// Keeping zero dice keeps none; keeping at least as many dice as were rolled
/// keeps all of them. Otherwise positions are ranked by value and the first
/// `n` are kept. Equal values rank leftmost first, so each duplicate is kept
/// at most once and the earliest occurrence wins.
pub fn select(values: &[i64], keep: Keep) -> Vec<bool> {
    let (count, highest) = match keep {
        Keep::All => return vec![true; values.len()],
        Keep::Highest(n) => (n as usize, true),
        Keep::Lowest(n) => (n as usize, false),
    };

    if count == 0 {
        return vec![false; values.len()];
    }
    if count >= values.len() {
        return vec![true; values.len()];
    }

    // Stable sorts keep equal values in roll order.
    let mut ranked: Vec<usize> = (0..values.len()).collect();
    if highest {
        ranked.sort_by_key(|&i| Reverse(values[i]));
    } else {
        ranked.sort_by_key(|&i| values[i]);
    }

    let mut kept = vec![false; values.len()];
    for &i in ranked.iter().take(count) {
        kept[i] = true;
    }
    kept
}
