//! Small boolean datasets used by the demos and the convergence tests.

use crate::error::{Error, Result};
use crate::train::Sample;

/// Widest input [`odd_count`] will enumerate (`2^20` samples).
pub const MAX_ODD_COUNT_BITS: u32 = 20;

fn gate(f: impl Fn(bool, bool) -> bool) -> Vec<Sample> {
    [(false, false), (false, true), (true, false), (true, true)]
        .into_iter()
        .map(|(a, b)| {
            Sample::new(
                vec![f64::from(u8::from(a)), f64::from(u8::from(b))],
                vec![f64::from(u8::from(f(a, b)))],
            )
        })
        .collect()
}

pub fn and_gate() -> Vec<Sample> {
    gate(|a, b| a && b)
}

pub fn or_gate() -> Vec<Sample> {
    gate(|a, b| a || b)
}

pub fn xor_gate() -> Vec<Sample> {
    gate(|a, b| a != b)
}

/// Every `bits`-wide input; the target is 1 when an odd number of bits are set.
///
/// `bits` above [`MAX_ODD_COUNT_BITS`] is a config error.
pub fn odd_count(bits: u32) -> Result<Vec<Sample>> {
    if bits > MAX_ODD_COUNT_BITS {
        return Err(Error::config(format!(
            "odd_count supports at most {MAX_ODD_COUNT_BITS} bits, got {bits}"
        )));
    }
    Ok((0..1u32 << bits)
        .map(|n| {
            let input = (0..bits)
                .rev()
                .map(|i| f64::from((n >> i) & 1))
                .collect();
            Sample::new(input, vec![f64::from(n.count_ones() % 2)])
        })
        .collect())
}
