//! Byte source boundary shared by every stream transform.
//!
//! Each transform pulls bytes one at a time and treats end of stream as a
//! termination condition: a group cut short is completed with zero bytes.

use std::io::{self, Read};

/// The outcome of pulling one byte from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadResult {
    Byte(u8),
    EndOfStream,
}

/// How much of a group was filled from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    /// Bytes taken from the source; the rest of the group is zero.
    pub read: usize,
    /// Set when end of stream was observed while filling the group.
    pub ended: bool,
}

impl Group {
    /// `true` when not a single byte of the group came from the source.
    pub fn is_empty(&self) -> bool {
        return self.read == 0;
    }
}

/// A source of bytes that signals end of stream explicitly.
///
/// Implemented for every [`std::io::Read`], so files, sockets, slices and
/// cursors can all be fed to the codecs directly.
pub trait ByteSource {
    fn next_byte(&mut self) -> io::Result<ReadResult>;

    /// Fills `group` from the source, zero-padding whatever is left once the
    /// stream ends.
    ///
    /// # Arguments
    /// - `group`: The buffer to fill, its length is the group size.
    ///
    /// # Returns
    /// A [`Group`] telling how many bytes were real and whether the stream ended.
    fn fill_group(&mut self, group: &mut [u8]) -> io::Result<Group> {
        let mut read = 0;

        while read < group.len() {
            match self.next_byte()? {
                ReadResult::Byte(value) => {
                    group[read] = value;
                    read += 1;
                }
                ReadResult::EndOfStream => {
                    group[read..].fill(0);
                    return Ok(Group { read, ended: true });
                }
            }
        }

        return Ok(Group { read, ended: false });
    }
}

impl<R: Read> ByteSource for R {
    fn next_byte(&mut self) -> io::Result<ReadResult> {
        let mut byte = [0u8; 1];

        loop {
            match self.read(&mut byte) {
                Ok(0) => return Ok(ReadResult::EndOfStream),
                Ok(_) => return Ok(ReadResult::Byte(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
