use std::io::Write;

use crate::error::Result;
use crate::stream::{ByteSource, ReadResult};

/// Counts the positions where two streams differ.
///
/// A byte present in only one of the streams counts as a difference.
///
/// # Example
/// ```
/// use linkfec::utils::count_byte_differences;
///
/// let diff = count_byte_differences(&mut &b"abcd"[..], &mut &b"abXdef"[..]).unwrap();
/// assert_eq!(diff, 3);
/// ```
pub fn count_byte_differences<A, B>(a: &mut A, b: &mut B) -> Result<usize>
where
    A: ByteSource + ?Sized,
    B: ByteSource + ?Sized,
{
    let mut differences = 0;

    loop {
        match (a.next_byte()?, b.next_byte()?) {
            (ReadResult::EndOfStream, ReadResult::EndOfStream) => break,
            (ReadResult::Byte(x), ReadResult::Byte(y)) if x == y => {}
            _ => differences += 1,
        }
    }

    return Ok(differences);
}

/// Writes the byte-wise XOR of two streams, up to the end of the shorter one.
///
/// Zero bytes in the output mark positions where the streams agree.
///
/// # Returns
/// The number of bytes written.
pub fn xor_streams<A, B, W>(a: &mut A, b: &mut B, output: &mut W) -> Result<usize>
where
    A: ByteSource + ?Sized,
    B: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    let mut written = 0;

    while let (ReadResult::Byte(x), ReadResult::Byte(y)) = (a.next_byte()?, b.next_byte()?) {
        output.write_all(&[x ^ y])?;
        written += 1;
    }

    return Ok(written);
}
