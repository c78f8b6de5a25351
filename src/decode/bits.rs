//! Bitfield extraction helpers (spec.md §4.1's `BIT`/`F` conventions).
//!
//! Generic over any unsigned integer the way `riscvemu/src/utils.rs` keeps
//! its field extraction generic rather than hard-coding `u32`; here the only
//! instantiation needed is `u16`, since every AVR opcode word is 16 bits.

use num::Integer;
use std::ops::{BitAnd, Shl, Shr};

/// An `n_bits`-long all-ones mask.
pub fn mask<T>(n_bits: T) -> T
where
    T: Integer + Shl<Output = T>,
{
    (T::one() << n_bits) - T::one()
}

/// `F(value, lo, width)`: extract `width` bits of `value` starting at bit
/// `lo`.
pub fn field<T>(value: T, lo: T, width: T) -> T
where
    T: Copy + Integer + Shl<Output = T> + Shr<Output = T> + BitAnd<Output = T>,
{
    mask(width) & (value >> lo)
}

/// `BIT(value, n)`: is bit `n` of `value` set?
pub fn bit(value: u16, n: u16) -> bool {
    field(value, n, 1) != 0
}
