//! # Reed-Solomon (2,1) erasure code
//!
//! A minimal systematic erasure code over GF(256): every block is two data
//! payloads followed by one parity payload,
//!
//! ```text
//! parity[i] = c0 * data0[i] + c1 * data1[i]
//! ```
//!
//! with nonzero coefficients `c0`, `c1` (both `1` by default, which makes the
//! parity the XOR of the two payloads). Any single erased data payload is
//! rebuilt from the other data payload and the parity.
//!
//! [`ParityMode::Product`] keeps the legacy `parity[i] = data0[i] * data1[i]`
//! with XOR recovery, for comparing against captures made by the old tools.
//!
//! The stream decoder has no presence flags to go on, so it treats a payload
//! whose bytes are all zero as erased. A payload that legitimately is all
//! zeros is indistinguishable from a lost one; when the framing layer knows
//! which packets were dropped, [`ReedSolomon::decode_with_erasures`] takes
//! those flags instead.
//!
//! # Usage
//!
//! ```
//! use linkfec::reed_solomon::ReedSolomon;
//!
//! let rs = ReedSolomon::default();
//!
//! let data = [[0x11u8; 4], [0x33u8; 4]].concat();
//! let mut encoded = Vec::new();
//! rs.encode(4, &mut &data[..], &mut encoded).unwrap();
//! assert_eq!(encoded.len(), 12);
//!
//! encoded[..4].fill(0); // lose the first payload
//!
//! let mut decoded = Vec::new();
//! let report = rs.decode(4, 3, &mut &encoded[..], &mut decoded).unwrap();
//! assert_eq!(report.recovered, 1);
//! assert_eq!(decoded, data);
//! ```
use std::io::Write;

use crate::config::{PadPolicy, ParityMode};
use crate::error::{Error, Result};
use crate::gf::{multiply, GF256};
use crate::stream::ByteSource;

/// Data payloads per block.
pub const DATA_PAYLOADS: usize = 2;

/// Payloads per block, data then parity.
pub const BLOCK_PAYLOADS: usize = 3;

/// What a decode pass managed.
///
/// # Fields
/// - `blocks`: Full blocks read
/// - `recovered`: Data payloads rebuilt from the parity
/// - `unrecoverable`: Blocks with an erased data payload and no usable parity,
///   passed through as received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecoveryReport {
    pub blocks: usize,
    pub recovered: usize,
    pub unrecoverable: usize,
}

/// A (2,1) Reed-Solomon erasure encoder/decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReedSolomon {
    mode: ParityMode,
    padding: PadPolicy,
}

impl ReedSolomon {
    pub fn new(mode: ParityMode, padding: PadPolicy) -> Self {
        return ReedSolomon { mode, padding };
    }

    pub fn mode(&self) -> ParityMode {
        return self.mode;
    }

    /// Computes the parity payload of two data payloads of equal length.
    pub fn parity(&self, data0: &[u8], data1: &[u8]) -> Vec<u8> {
        let pairs = data0.iter().zip(data1.iter());

        return match self.mode {
            ParityMode::Linear(coefficients) => {
                let c0 = GF256(coefficients.c0());
                let c1 = GF256(coefficients.c1());
                pairs
                    .map(|(&d0, &d1)| (c0 * GF256(d0) + c1 * GF256(d1)).0)
                    .collect()
            }
            ParityMode::Product => pairs.map(|(&d0, &d1)| multiply(d0, d1)).collect(),
        };
    }

    /// Rebuilds `data0` from `data1` and the parity, in place.
    fn recover_first(&self, data0: &mut [u8], data1: &[u8], parity: &[u8]) {
        match self.mode {
            ParityMode::Linear(coefficients) => {
                let c0 = GF256(coefficients.c0());
                let c1 = GF256(coefficients.c1());
                for i in 0..data0.len() {
                    data0[i] = ((GF256(parity[i]) - c1 * GF256(data1[i])) / c0).0;
                }
            }
            ParityMode::Product => {
                for i in 0..data0.len() {
                    data0[i] = parity[i] ^ data1[i];
                }
            }
        }
    }

    /// Rebuilds `data1` from `data0` and the parity, in place.
    fn recover_second(&self, data0: &[u8], data1: &mut [u8], parity: &[u8]) {
        match self.mode {
            ParityMode::Linear(coefficients) => {
                let c0 = GF256(coefficients.c0());
                let c1 = GF256(coefficients.c1());
                for i in 0..data1.len() {
                    data1[i] = ((GF256(parity[i]) - c0 * GF256(data0[i])) / c1).0;
                }
            }
            ParityMode::Product => {
                for i in 0..data1.len() {
                    data1[i] = parity[i] ^ data0[i];
                }
            }
        }
    }

    /// Encodes a stream into blocks of two data payloads and one parity payload.
    ///
    /// # Arguments
    /// - `payload_length`: Bytes per payload, at least 1
    /// - `input`: The raw bytes, zero-padded to a whole block at the end
    /// - `output`: Where the blocks are written
    ///
    /// # Returns
    /// The number of blocks written.
    pub fn encode<S, W>(&self, payload_length: usize, input: &mut S, output: &mut W) -> Result<usize>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        if payload_length == 0 {
            return Err(Error::InvalidPayloadLength(payload_length));
        }

        let mut data = vec![0u8; DATA_PAYLOADS * payload_length];
        let mut blocks = 0;

        loop {
            let group = input.fill_group(&mut data)?;
            if !self.padding.emits(group.read) {
                break;
            }

            let (data0, data1) = data.split_at(payload_length);
            output.write_all(&data)?;
            output.write_all(&self.parity(data0, data1))?;
            blocks += 1;

            if group.ended {
                break;
            }
        }

        return Ok(blocks);
    }

    /// Decodes `payload_count` payloads, treating all-zero payloads as erased.
    ///
    /// Per block: an erased `data0` with a present parity is rebuilt, else an
    /// erased `data1` with a present parity is rebuilt, else both data
    /// payloads are emitted as received. Payloads past the last full block are
    /// emitted unchanged.
    ///
    /// # Arguments
    /// - `payload_length`: Bytes per payload
    /// - `payload_count`: Payloads to read, parity included
    /// - `input`: The received payloads
    /// - `output`: Where the data payloads are written
    ///
    /// # Returns
    /// A [`RecoveryReport`].
    pub fn decode<S, W>(
        &self,
        payload_length: usize,
        payload_count: usize,
        input: &mut S,
        output: &mut W,
    ) -> Result<RecoveryReport>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        return self.decode_blocks(payload_length, payload_count, input, output, |_, payload| {
            payload.iter().all(|&byte| byte == 0)
        });
    }

    /// Decodes with explicit erasure flags, one per payload, instead of the
    /// all-zero heuristic.
    ///
    /// # Arguments
    /// - `payload_length`: Bytes per payload
    /// - `erasures`: `true` for every payload known to be lost, e.g.
    ///   [`crate::pack::DeframeReport::dropped`]
    /// - `input`: The received payloads
    /// - `output`: Where the data payloads are written
    pub fn decode_with_erasures<S, W>(
        &self,
        payload_length: usize,
        erasures: &[bool],
        input: &mut S,
        output: &mut W,
    ) -> Result<RecoveryReport>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        return self.decode_blocks(payload_length, erasures.len(), input, output, |index, _| {
            erasures[index]
        });
    }

    fn decode_blocks<S, W, E>(
        &self,
        payload_length: usize,
        payload_count: usize,
        input: &mut S,
        output: &mut W,
        is_erased: E,
    ) -> Result<RecoveryReport>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
        E: Fn(usize, &[u8]) -> bool,
    {
        if payload_length == 0 {
            return Err(Error::InvalidPayloadLength(payload_length));
        }

        let mut block = vec![0u8; BLOCK_PAYLOADS * payload_length];
        let mut report = RecoveryReport::default();

        for index in 0..payload_count / BLOCK_PAYLOADS {
            input.fill_group(&mut block)?;

            let first = index * BLOCK_PAYLOADS;
            let (data, parity) = block.split_at_mut(DATA_PAYLOADS * payload_length);
            let (data0, data1) = data.split_at_mut(payload_length);

            let erased0 = is_erased(first, &*data0);
            let erased1 = is_erased(first + 1, &*data1);
            let erased_parity = is_erased(first + 2, &*parity);

            if erased0 && !erased_parity {
                self.recover_first(data0, data1, parity);
                if erased1 {
                    // data1 was zero-filled, so data0 came back as the parity combination
                    report.unrecoverable += 1;
                    tracing::debug!(block = index, "both data payloads lost, first rebuilt from parity alone");
                } else {
                    report.recovered += 1;
                    tracing::debug!(block = index, "recovered first data payload");
                }
            } else if erased1 && !erased_parity {
                self.recover_second(data0, data1, parity);
                report.recovered += 1;
                tracing::debug!(block = index, "recovered second data payload");
            } else if erased0 || erased1 {
                report.unrecoverable += 1;
                tracing::debug!(block = index, "erasure without usable parity, passing through");
            }

            output.write_all(data)?;
            report.blocks += 1;
        }

        let mut payload = vec![0u8; payload_length];
        for _ in 0..payload_count % BLOCK_PAYLOADS {
            input.fill_group(&mut payload)?;
            output.write_all(&payload)?;
        }

        return Ok(report);
    }
}
