//! Channel noise injectors for exercising the pipeline.
//!
//! Both stages copy a stream while corrupting some of it, and are meant to sit
//! between framing and deframing. The codecs never special-case their output.

use std::io::Write;

use rand::Rng;

use crate::error::{Error, Result};
use crate::stream::{ByteSource, ReadResult};

/// Copies `input` to `output`, inverting every `stride`-th byte.
///
/// Bytes `stride`, `2 * stride`, ... (counting from 1) are XORed with `0xFF`.
///
/// # Returns
/// The number of bytes inverted.
///
/// # Example
/// ```
/// use linkfec::noise::invert_every;
///
/// let mut out = Vec::new();
/// invert_every(3, &mut &[1u8, 2, 3, 4, 5, 6, 7][..], &mut out).unwrap();
/// assert_eq!(out, [1, 2, 0xFC, 4, 5, 0xF9, 7]);
/// ```
pub fn invert_every<S, W>(stride: usize, input: &mut S, output: &mut W) -> Result<usize>
where
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    if stride == 0 {
        return Err(Error::InvalidStride(stride));
    }

    let mut position = 0;
    let mut inverted = 0;

    while let ReadResult::Byte(value) = input.next_byte()? {
        position += 1;

        if position % stride == 0 {
            output.write_all(&[value ^ 0xFF])?;
            inverted += 1;
        } else {
            output.write_all(&[value])?;
        }
    }

    return Ok(inverted);
}

/// Copies `input` to `output`, flipping every bit independently with
/// probability `2^-shift`.
///
/// `shift == 0` flips every bit. The random source is supplied by the caller,
/// so a seeded generator gives a reproducible channel.
///
/// # Returns
/// The number of bits flipped.
pub fn scramble<R, S, W>(shift: u32, rng: &mut R, input: &mut S, output: &mut W) -> Result<usize>
where
    R: Rng,
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    if shift >= 32 {
        return Err(Error::InvalidStride(shift as usize));
    }

    let odds: u32 = 1 << shift;
    let mut flipped = 0;

    while let ReadResult::Byte(value) = input.next_byte()? {
        let mut mask: u8 = 0;
        for bit in 0..8 {
            if rng.gen_range(0..odds) == 0 {
                mask |= 1 << bit;
            }
        }

        flipped += mask.count_ones() as usize;
        output.write_all(&[value ^ mask])?;
    }

    return Ok(flipped);
}
