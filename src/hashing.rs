//! Primality helpers and ready-made hash functions.
//!
//! Every hash function here has the shape `(key, modulus) -> index` expected by
//! [`ChainedHashMap`](crate::ChainedHashMap) and
//! [`OpenAddressingHashMap`](crate::OpenAddressingHashMap), and always returns a
//! value in `0..modulus` (or `0` when `modulus` is `0`).

/// Multiplier for [`fibonacci`]: `2^32` divided by the golden ratio.
const FIBONACCI_MULTIPLIER: u32 = 2_654_435_769;

/// Initial multiplier of [`sedgwick`].
const SEDGWICK_A: usize = 31_415;

/// Multiplier update factor of [`sedgwick`].
const SEDGWICK_B: usize = 27_183;

/// A hash function pointer: `(key, modulus) -> index`.
pub type HashFn<K> = fn(&K, usize) -> usize;

/// Integer keys accepted by [`modulo`] and [`fibonacci`].
pub trait IntegerKey: Copy {
    /// Reinterprets the key as an unsigned 64-bit value.
    ///
    /// Negative values wrap, so `-1` maps to `u64::MAX`.
    fn to_u64(self) -> u64;
}

/// Implements [`IntegerKey`] for primitive integers.
macro_rules! impl_integer_key {
    ($($t:ty),*) => {
        $(
            impl IntegerKey for $t {
                #[allow(
                    clippy::cast_sign_loss,
                    clippy::cast_lossless,
                    clippy::cast_possible_truncation,
                    clippy::unnecessary_cast,
                    trivial_numeric_casts
                )]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_integer_key!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Reduces a 64-bit hash to `0..modulus`.
#[allow(clippy::cast_possible_truncation)]
fn reduce(hash: u64, modulus: usize) -> usize {
    // usize is at most 64 bits on supported targets, so the modulus fits in u64
    // and the remainder fits back into usize.
    hash.checked_rem(modulus as u64).map_or(0, |index| index as usize)
}

/// Division hashing: `key mod modulus`.
#[must_use]
pub fn modulo<K: IntegerKey>(key: &K, modulus: usize) -> usize {
    reduce(key.to_u64(), modulus)
}

/// Multiplicative (Fibonacci) hashing.
///
/// Takes the top `p` bits of `key * 2654435769 mod 2^32`, where
/// `p = ceil(log2(modulus))`. When `modulus` is not a power of two the result
/// is folded back into range.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn fibonacci<K: IntegerKey>(key: &K, modulus: usize) -> usize {
    let bits = match modulus {
        0 | 1 => 0,
        _ => (usize::BITS.saturating_sub(modulus.saturating_sub(1).leading_zeros())).min(32),
    };
    let product = (key.to_u64() as u32).wrapping_mul(FIBONACCI_MULTIPLIER);
    let hash = u64::from(product).checked_shr(32_u32.saturating_sub(bits)).unwrap_or(0);
    reduce(hash, modulus)
}

/// String hashing by shifting the running sum left three bits before adding
/// each byte.
#[must_use]
pub fn shift_sum<S: AsRef<str> + ?Sized>(key: &S, modulus: usize) -> usize {
    let sum = key
        .as_ref()
        .bytes()
        .fold(0_u64, |sum, byte| sum.wrapping_shl(3).wrapping_add(u64::from(byte)));
    reduce(sum, modulus)
}

/// Sedgwick's universal string hash.
///
/// The multiplier changes with every byte (`a = a * b mod (modulus - 1)`), which
/// spreads keys sharing long prefixes.
#[must_use]
pub fn sedgwick<S: AsRef<str> + ?Sized>(key: &S, modulus: usize) -> usize {
    let Some(multiplier_modulus) = modulus.checked_sub(1).filter(|m| *m > 0) else {
        return 0;
    };

    let mut a = SEDGWICK_A;
    let mut hash = 0_usize;
    for byte in key.as_ref().bytes() {
        hash = a
            .wrapping_mul(hash)
            .wrapping_add(usize::from(byte))
            .checked_rem(modulus)
            .unwrap_or(0);
        a = a.wrapping_mul(SEDGWICK_B).checked_rem(multiplier_modulus).unwrap_or(0);
    }
    hash
}

/// Additive string hashing with a multiplier coprime to `modulus`.
///
/// The multiplier starts at 7 and moves to the next prime until it shares no
/// factor with `modulus`; every byte then adds the multiplier and its own value
/// to the running hash.
#[must_use]
pub fn coprime_sum<S: AsRef<str> + ?Sized>(key: &S, modulus: usize) -> usize {
    if modulus == 0 {
        return 0;
    }

    let mut multiplier = 7_usize;
    while gcd(multiplier, modulus) > 1 {
        multiplier = next_prime(multiplier.saturating_add(1));
    }
    key.as_ref().bytes().fold(0_usize, |hash, byte| {
        hash.wrapping_add(multiplier)
            .wrapping_add(usize::from(byte))
            .checked_rem(modulus)
            .unwrap_or(0)
    })
}

/// Greatest common divisor (Euclid).
#[must_use]
pub fn gcd(mut first: usize, mut second: usize) -> usize {
    while let Some(remainder) = first.checked_rem(second) {
        first = second;
        second = remainder;
    }
    first
}

/// Returns true if `number` is prime.
///
/// Uses trial division by `6k ± 1` candidates.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(number: usize) -> bool {
    if number < 4 {
        return number >= 2;
    }
    if number % 2 == 0 || number % 3 == 0 {
        return false;
    }

    // candidate <= number / candidate avoids overflowing candidate * candidate
    let mut candidate = 5_usize;
    while candidate <= number / candidate {
        if number % candidate == 0 || number % (candidate + 2) == 0 {
            return false;
        }
        candidate += 6;
    }
    true
}

/// Returns the smallest prime greater than or equal to `number`.
///
/// Values below 2 yield 2. Saturates at `usize::MAX` in the (unreachable in
/// practice) case where no prime fits.
#[must_use]
pub fn next_prime(number: usize) -> usize {
    if number <= 2 {
        return 2;
    }

    let mut candidate = number | 1;
    while !is_prime(candidate) {
        match candidate.checked_add(2) {
            Some(next) => candidate = next,
            None => return usize::MAX,
        }
    }
    candidate
}
