//! # Hamming(7,4), byte-parallel
//!
//! Every byte position of a codeword carries 8 independent Hamming(7,4)
//! codes, one per bit lane. Four data bytes `d1..d4` are followed by three
//! parity bytes:
//!
//! - `p1 = d1 ^ d2 ^ d4`
//! - `p2 = d1 ^ d3 ^ d4`
//! - `p3 = d2 ^ d3 ^ d4`
//!
//! Decoding computes a 3-byte syndrome and, lane by lane, flips the bit whose
//! column in [`SYNDROME_MATRIX`] matches the lane's syndrome. One bit error
//! per lane per codeword is corrected; two or more in the same lane are
//! silently miscorrected or passed through.
//!
//! ```
//! use linkfec::hamming::HammingCodec;
//!
//! let codec = HammingCodec::default();
//!
//! let mut encoded = Vec::new();
//! codec.encode(&mut &b"wire"[..], &mut encoded).unwrap();
//! assert_eq!(encoded.len(), 7);
//!
//! encoded[2] ^= 0x10;
//!
//! let mut decoded = Vec::new();
//! codec.decode(&mut &encoded[..], &mut decoded).unwrap();
//! assert_eq!(decoded, b"wire");
//! ```
use std::io::Write;

use crate::config::PadPolicy;
use crate::error::Result;
use crate::stream::ByteSource;

/// Data bytes per codeword.
pub const DATA_LEN: usize = 4;

/// Bytes per codeword, data then parity.
pub const CODEWORD_LEN: usize = 7;

/// Parity-check matrix, one row per syndrome byte and one column per codeword
/// position `(d1, d2, d3, d4, p1, p2, p3)`.
pub const SYNDROME_MATRIX: [[u8; CODEWORD_LEN]; 3] = [
    [1, 1, 0, 1, 1, 0, 0],
    [1, 0, 1, 1, 0, 1, 0],
    [0, 1, 1, 1, 0, 0, 1],
];

/// [`SYNDROME_MATRIX`] with every entry widened to a full lane mask, so a whole
/// byte can be tested against a column at once.
const LANE_MATRIX: [[u8; CODEWORD_LEN]; 3] = widen(SYNDROME_MATRIX);

const fn widen(matrix: [[u8; CODEWORD_LEN]; 3]) -> [[u8; CODEWORD_LEN]; 3] {
    let mut lanes = [[0u8; CODEWORD_LEN]; 3];
    let mut row = 0;

    while row < 3 {
        let mut col = 0;
        while col < CODEWORD_LEN {
            lanes[row][col] = if matrix[row][col] != 0 { 0xFF } else { 0x00 };
            col += 1;
        }
        row += 1;
    }

    return lanes;
}

/// Lanes touched while correcting one codeword.
///
/// # Fields
/// - `corrected`: Mask of the lanes where a bit was flipped
/// - `uncorrectable`: Mask of the lanes whose syndrome matched no position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Correction {
    pub corrected: u8,
    pub uncorrectable: u8,
}

/// A 7-byte codeword `(d1, d2, d3, d4, p1, p2, p3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeword(pub [u8; CODEWORD_LEN]);

impl Codeword {
    /// Builds the codeword for four data bytes.
    ///
    /// # Example
    /// ```
    /// use linkfec::hamming::Codeword;
    ///
    /// let codeword = Codeword::encode([0x01, 0x02, 0x04, 0x08]);
    /// assert_eq!(codeword.0, [0x01, 0x02, 0x04, 0x08, 0x0B, 0x0D, 0x0E]);
    /// ```
    pub fn encode(data: [u8; DATA_LEN]) -> Self {
        let [d1, d2, d3, d4] = data;

        return Codeword([d1, d2, d3, d4, d1 ^ d2 ^ d4, d1 ^ d3 ^ d4, d2 ^ d3 ^ d4]);
    }

    pub fn syndrome(&self) -> [u8; 3] {
        let mut syndrome = [0u8; 3];

        for (s, row) in LANE_MATRIX.iter().enumerate() {
            for (byte, mask) in self.0.iter().zip(row.iter()) {
                syndrome[s] ^= byte & mask;
            }
        }

        return syndrome;
    }

    /// Corrects at most one bit per lane in place.
    ///
    /// Lanes with a zero syndrome are left alone. For every other lane the
    /// positions are searched in order and the first one whose column equals
    /// the lane's syndrome gets its bit flipped.
    pub fn correct(&mut self) -> Correction {
        let syndrome = self.syndrome();
        let lanes = syndrome[0] | syndrome[1] | syndrome[2];
        let mut correction = Correction::default();

        if lanes == 0 {
            return correction;
        }

        for lane in 0..8 {
            let mask: u8 = 1 << lane;
            if lanes & mask == 0 {
                continue;
            }

            match locate(&syndrome, mask) {
                Some(position) => {
                    self.0[position] ^= mask;
                    correction.corrected |= mask;
                }
                None => correction.uncorrectable |= mask,
            }
        }

        return correction;
    }

    pub fn data(&self) -> [u8; DATA_LEN] {
        return [self.0[0], self.0[1], self.0[2], self.0[3]];
    }
}

/// First codeword position whose column agrees with `syndrome` on the lane
/// selected by `mask`.
fn locate(syndrome: &[u8; 3], mask: u8) -> Option<usize> {
    return (0..CODEWORD_LEN).find(|&position| {
        (0..3).all(|s| !(LANE_MATRIX[s][position] ^ syndrome[s]) & mask != 0)
    });
}

/// What a decode pass ran into.
///
/// # Fields
/// - `codewords`: Codewords read and emitted
/// - `corrected_lanes`: Single-bit corrections applied, counted per lane
/// - `uncorrectable_lanes`: Lanes left as received because no position matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HammingReport {
    pub codewords: usize,
    pub corrected_lanes: usize,
    pub uncorrectable_lanes: usize,
}

/// Stream encoder and decoder for the byte-parallel Hamming(7,4) code.
#[derive(Debug, Clone, Copy, Default)]
pub struct HammingCodec {
    padding: PadPolicy,
}

impl HammingCodec {
    pub fn new(padding: PadPolicy) -> Self {
        return HammingCodec { padding };
    }

    /// Encodes a stream, four bytes in, seven bytes out.
    ///
    /// A final group cut short by end of stream is zero-padded and still
    /// encoded.
    ///
    /// # Arguments
    /// - `input`: The raw bytes
    /// - `output`: Where the codewords are written
    ///
    /// # Returns
    /// The number of codewords written.
    pub fn encode<S, W>(&self, input: &mut S, output: &mut W) -> Result<usize>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        let mut data = [0u8; DATA_LEN];
        let mut codewords = 0;

        loop {
            let group = input.fill_group(&mut data)?;
            if !self.padding.emits(group.read) {
                break;
            }

            output.write_all(&Codeword::encode(data).0)?;
            codewords += 1;

            if group.ended {
                break;
            }
        }

        return Ok(codewords);
    }

    /// Decodes a stream, seven bytes in, four bytes out, correcting one bit
    /// error per lane per codeword.
    ///
    /// # Arguments
    /// - `input`: The received codewords, possibly corrupted
    /// - `output`: Where the decoded data bytes are written
    ///
    /// # Returns
    /// A [`HammingReport`] of the corrections made.
    pub fn decode<S, W>(&self, input: &mut S, output: &mut W) -> Result<HammingReport>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        let mut received = [0u8; CODEWORD_LEN];
        let mut report = HammingReport::default();

        loop {
            let group = input.fill_group(&mut received)?;
            if !self.padding.emits(group.read) {
                break;
            }

            let mut codeword = Codeword(received);
            let correction = codeword.correct();

            if correction.uncorrectable != 0 {
                tracing::debug!(
                    codeword = report.codewords,
                    lanes = correction.uncorrectable,
                    "syndrome matched no position, passing lanes through"
                );
            }

            report.codewords += 1;
            report.corrected_lanes += correction.corrected.count_ones() as usize;
            report.uncorrectable_lanes += correction.uncorrectable.count_ones() as usize;

            output.write_all(&codeword.data())?;

            if group.ended {
                break;
            }
        }

        return Ok(report);
    }
}
