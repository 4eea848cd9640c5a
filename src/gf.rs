//! # GF(256) arithmetic
//!
//! Arithmetic over GF(2^8) with the generator polynomial
//! `x^8 + x^4 + x^3 + x^2 + 1` (`0x11D`, decimal 285). Addition and
//! subtraction are XOR; multiplication is a carry-less multiply followed by a
//! reduction modulo the generator.
//!
//! ```
//! use linkfec::gf::{multiply, GF256};
//!
//! assert_eq!(multiply(0x02, 0x80), 0x1D);
//! assert_eq!(GF256(0x53) * GF256(0x01), GF256(0x53));
//! ```
use std::ops::{Add, Div, Mul, Sub};

/// The generator polynomial, bit 8 included.
pub const GENERATOR: u16 = 0x11D;

/// Multiplies two polynomials over GF(2) without reducing the result.
///
/// The product of two degree-7 polynomials has degree at most 14, so it always
/// fits in a `u16`.
pub const fn carryless_multiply(a: u8, b: u8) -> u16 {
    let mut product: u16 = 0;
    let mut a = a as u16;
    let mut b = b;

    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        a <<= 1;
        b >>= 1;
    }

    return product;
}

/// Reduces a 16-bit polynomial modulo [`GENERATOR`].
///
/// Each set bit above bit 7 is cancelled, highest first, by XORing the
/// generator shifted so its leading term lines up with that bit.
pub const fn reduce(value: u16) -> u8 {
    let mut value = value;
    let mut bit: u32 = 15;

    while bit >= 8 {
        if value & (1 << bit) != 0 {
            value ^= GENERATOR << (bit - 8);
        }
        bit -= 1;
    }

    return value as u8;
}

/// Multiplies two field elements.
///
/// # Arguments
/// - `a`: The first factor
/// - `b`: The second factor
///
/// # Returns
/// The reduced product, `a * b mod 0x11D`.
pub const fn multiply(a: u8, b: u8) -> u8 {
    return reduce(carryless_multiply(a, b));
}

/// A GF(256) element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GF256(pub u8);

impl GF256 {
    pub fn new(value: u8) -> Self {
        return GF256(value);
    }

    /// Multiplicative inverse, `a^254` by square-and-multiply. The inverse of
    /// zero is taken as zero.
    pub fn inverse(a: u8) -> u8 {
        if a == 0 {
            return 0;
        }

        let mut result: u8 = 1;
        let mut base: u8 = a;
        let mut exponent: u8 = 254;

        while exponent != 0 {
            if exponent & 1 != 0 {
                result = multiply(result, base);
            }
            base = multiply(base, base);
            exponent >>= 1;
        }

        return result;
    }
}

impl Add for GF256 {
    type Output = GF256;

    fn add(self, rhs: GF256) -> GF256 {
        return GF256(self.0 ^ rhs.0);
    }
}

impl Sub for GF256 {
    type Output = GF256;

    fn sub(self, rhs: GF256) -> GF256 {
        return GF256(self.0 ^ rhs.0);
    }
}

impl Mul for GF256 {
    type Output = GF256;

    fn mul(self, rhs: GF256) -> GF256 {
        return GF256(multiply(self.0, rhs.0));
    }
}

impl Div for GF256 {
    type Output = GF256;

    // Division by zero yields zero rather than panicking.
    fn div(self, rhs: GF256) -> GF256 {
        return GF256(multiply(self.0, GF256::inverse(rhs.0)));
    }
}
