//! # Codeword interleaving
//!
//! Spreads the 7 bytes of every Hamming codeword over 7 different packets.
//! A group of `7 * payload_length` encoded bytes is read position-major into
//! 7 rows: codeword `i` puts its byte `r` at position `i` of row `r`. With
//! [`InterleaveFraming::PerRow`] (the default) each row then travels as its own
//! frame, so losing a whole packet costs every codeword of the group one byte,
//! which the Hamming decoder repairs. [`InterleaveFraming::SuperPacket`] puts
//! one header in front of all 7 rows instead, the legacy wire layout, where a
//! damaged header loses the whole group.
//!
//! ```
//! use linkfec::hamming::HammingCodec;
//! use linkfec::interleave::Interleaver;
//! use linkfec::pack::PacketFramer;
//!
//! let codec = HammingCodec::default();
//! let framer = PacketFramer::default();
//! let interleaver = Interleaver::default();
//!
//! let data = [0x5Au8; 32];
//! let mut encoded = Vec::new();
//! codec.encode(&mut &data[..], &mut encoded).unwrap();
//!
//! let mut wire = Vec::new();
//! let summary = interleaver.interleave_hamming(&framer, 8, &mut &encoded[..], &mut wire).unwrap();
//! assert_eq!(summary.packets, 7);
//!
//! // lose the third packet entirely
//! let start = 2 * (8 + 8);
//! wire[start..start + 16].fill(0);
//!
//! let mut rows = Vec::new();
//! framer.deframe_stream(summary.packets, 8, &mut &wire[..], &mut rows).unwrap();
//!
//! let mut restored = Vec::new();
//! interleaver.deinterleave_hamming(8, &mut &rows[..], &mut restored).unwrap();
//!
//! let mut decoded = Vec::new();
//! codec.decode(&mut &restored[..], &mut decoded).unwrap();
//! assert_eq!(decoded, data);
//! ```
use std::io::Write;

use crate::config::PadPolicy;
use crate::error::{Error, Result};
use crate::hamming::CODEWORD_LEN;
use crate::pack::{validate_length, PacketFramer};
use crate::stream::ByteSource;

/// Number of rows, one per codeword byte.
pub const ROWS: usize = CODEWORD_LEN;

/// What an interleave pass wrote.
///
/// # Fields
/// - `groups`: Groups of 7 rows written
/// - `packets`: Frames written, 7 per group or 1 per group for super-packets
/// - `bytes`: Payload bytes framed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterleaveSummary {
    pub groups: usize,
    pub packets: usize,
    pub bytes: usize,
}

/// How [`Interleaver::interleave_hamming`] frames the rows of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterleaveFraming {
    /// One frame of `payload_length` bytes per row, 7 per group.
    #[default]
    PerRow,
    /// One frame of `7 * payload_length` bytes per group, rows back to back.
    SuperPacket,
}

impl InterleaveFraming {
    /// Frames written per group.
    pub fn packets_per_group(&self) -> usize {
        return match self {
            InterleaveFraming::PerRow => ROWS,
            InterleaveFraming::SuperPacket => 1,
        };
    }

    /// Payload length of every frame for rows of `payload_length` bytes.
    pub fn frame_length(&self, payload_length: usize) -> usize {
        return match self {
            InterleaveFraming::PerRow => payload_length,
            InterleaveFraming::SuperPacket => ROWS * payload_length,
        };
    }
}

/// Position-major interleaver over 7 rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interleaver {
    padding: PadPolicy,
    framing: InterleaveFraming,
}

impl Interleaver {
    pub fn new(padding: PadPolicy) -> Self {
        return Interleaver {
            padding,
            framing: InterleaveFraming::default(),
        };
    }

    pub fn with_framing(mut self, framing: InterleaveFraming) -> Self {
        self.framing = framing;
        return self;
    }

    pub fn framing(&self) -> InterleaveFraming {
        return self.framing;
    }

    /// Reorders a stream into rows without framing them.
    ///
    /// # Arguments
    /// - `payload_length`: Bytes per row, at least 1
    /// - `input`: The Hamming-encoded stream
    /// - `output`: Where the 7 rows of every group are written back to back
    ///
    /// # Returns
    /// The number of groups written.
    pub fn interleave<S, W>(&self, payload_length: usize, input: &mut S, output: &mut W) -> Result<usize>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        return self.interleave_rows(payload_length, input, |rows| {
            output.write_all(rows)?;
            return Ok(());
        });
    }

    /// Reorders a Hamming-encoded stream into rows and frames them according
    /// to [`Self::framing`].
    ///
    /// # Arguments
    /// - `framer`: The framer writing the headers
    /// - `payload_length`: Bytes per row; the resulting frame length
    ///   ([`InterleaveFraming::frame_length`]) must be a valid non-jumbo length
    /// - `input`: The Hamming-encoded stream
    /// - `output`: Where the frames are written
    ///
    /// # Returns
    /// An [`InterleaveSummary`], whose `packets` is what the deframer expects.
    pub fn interleave_hamming<S, W>(
        &self,
        framer: &PacketFramer,
        payload_length: usize,
        input: &mut S,
        output: &mut W,
    ) -> Result<InterleaveSummary>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        validate_length(self.framing.frame_length(payload_length))?;

        let groups = self.interleave_rows(payload_length, input, |rows| {
            match self.framing {
                InterleaveFraming::PerRow => {
                    for row in rows.chunks_exact(payload_length) {
                        framer.write_frame(row, output)?;
                    }
                }
                InterleaveFraming::SuperPacket => framer.write_frame(rows, output)?,
            }
            return Ok(());
        })?;

        return Ok(InterleaveSummary {
            groups,
            packets: groups * self.framing.packets_per_group(),
            bytes: groups * ROWS * payload_length,
        });
    }

    fn interleave_rows<S, F>(&self, payload_length: usize, input: &mut S, mut emit: F) -> Result<usize>
    where
        S: ByteSource + ?Sized,
        F: FnMut(&[u8]) -> Result<()>,
    {
        if payload_length == 0 {
            return Err(Error::InvalidPayloadLength(payload_length));
        }

        let mut columns = vec![0u8; ROWS * payload_length];
        let mut rows = vec![0u8; ROWS * payload_length];
        let mut groups = 0;

        loop {
            let group = input.fill_group(&mut columns)?;
            if !self.padding.emits(group.read) {
                break;
            }

            for position in 0..payload_length {
                for row in 0..ROWS {
                    rows[row * payload_length + position] = columns[position * ROWS + row];
                }
            }

            emit(&rows)?;
            groups += 1;

            if group.ended {
                break;
            }
        }

        return Ok(groups);
    }

    /// Restores codeword order from deframed rows.
    ///
    /// # Arguments
    /// - `payload_length`: Bytes per row, as used when interleaving
    /// - `input`: The rows, 7 per group, headers already stripped
    /// - `output`: Where the Hamming-encoded stream is written
    ///
    /// # Returns
    /// The number of groups restored.
    pub fn deinterleave_hamming<S, W>(&self, payload_length: usize, input: &mut S, output: &mut W) -> Result<usize>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        if payload_length == 0 {
            return Err(Error::InvalidPayloadLength(payload_length));
        }

        let mut rows = vec![0u8; ROWS * payload_length];
        let mut columns = vec![0u8; ROWS * payload_length];
        let mut groups = 0;

        loop {
            let group = input.fill_group(&mut rows)?;
            if !self.padding.emits(group.read) {
                break;
            }

            for row in 0..ROWS {
                for position in 0..payload_length {
                    columns[position * ROWS + row] = rows[row * payload_length + position];
                }
            }

            output.write_all(&columns)?;
            groups += 1;

            if group.ended {
                break;
            }
        }

        return Ok(groups);
    }
}
