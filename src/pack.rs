//! # Packet framing
//!
//! A UDP-like framing layer used to study how header corruption turns into
//! whole-packet loss. Every frame is an 8-byte header followed by the payload:
//!
//! | bytes | field       | valid value                |
//! |-------|-------------|----------------------------|
//! | 0..2  | source port | `FrameConfig::src_port`    |
//! | 2..4  | dest port   | `0xFFFF`, broadcast        |
//! | 4..6  | length      | payload length, 0 = jumbo  |
//! | 6..8  | checksum    | `0x0000`, no checksum      |
//!
//! The deframer never fails on content: a frame whose header differs from the
//! expected pattern in any byte is "dropped" and its payload replaced by zeros.
//!
//! ```
//! use linkfec::pack::PacketFramer;
//!
//! let framer = PacketFramer::default();
//! let data = b"a payload that spans several frames";
//!
//! let mut wire = Vec::new();
//! let packets = framer.frame_stream(8, &mut &data[..], &mut wire).unwrap();
//! assert_eq!(packets, 5);
//!
//! wire[0] ^= 0xFF; // corrupt the first header
//!
//! let mut received = Vec::new();
//! let report = framer.deframe_stream(packets, 8, &mut &wire[..], &mut received).unwrap();
//! assert_eq!(report.dropped_count(), 1);
//! assert_eq!(&received[..8], &[0u8; 8]);
//! assert_eq!(&received[8..data.len()], &data[8..]);
//! ```
use std::io::Write;

use crate::config::FrameConfig;
use crate::error::{Error, Result};
use crate::stream::{ByteSource, ReadResult};

/// Size of the frame header.
pub const HEADER_LEN: usize = 8;

/// Largest payload length the 2-byte length field can carry.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Length field value marking a payload too large to describe, which then
/// runs to the end of the stream.
pub const JUMBO: usize = 0;

/// Checks a frame length against `{0, 1} ∪ [8, 65535]`.
pub fn validate_length(length: usize) -> Result<()> {
    if length > MAX_PAYLOAD_LEN || (1 < length && length < HEADER_LEN) {
        return Err(Error::InvalidLength(length));
    }

    return Ok(());
}

/// A frame header.
///
/// # Fields
/// - `src_port`: Source port
/// - `dst_port`: Destination port
/// - `length`: Payload length, `0` for a jumbo payload
/// - `checksum`: Checksum field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16,
    pub checksum: u16,
}

impl Header {
    /// The header every valid frame of `length` payload bytes carries.
    pub fn expected(config: &FrameConfig, length: u16) -> Self {
        return Header {
            src_port: config.src_port,
            dst_port: config.dst_port,
            length,
            checksum: config.checksum,
        };
    }

    pub fn to_bytes(&self, config: &FrameConfig) -> [u8; HEADER_LEN] {
        let order = config.byte_order;
        let mut bytes = [0u8; HEADER_LEN];

        bytes[0..2].copy_from_slice(&order.encode(self.src_port));
        bytes[2..4].copy_from_slice(&order.encode(self.dst_port));
        bytes[4..6].copy_from_slice(&order.encode(self.length));
        bytes[6..8].copy_from_slice(&order.encode(self.checksum));

        return bytes;
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN], config: &FrameConfig) -> Self {
        let order = config.byte_order;

        return Header {
            src_port: order.decode([bytes[0], bytes[1]]),
            dst_port: order.decode([bytes[2], bytes[3]]),
            length: order.decode([bytes[4], bytes[5]]),
            checksum: order.decode([bytes[6], bytes[7]]),
        };
    }
}

/// Outcome of a deframe pass.
///
/// # Fields
/// - `dropped`: One flag per expected frame, `true` when its header did not
///   match and its payload was zero-filled
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeframeReport {
    pub dropped: Vec<bool>,
}

impl DeframeReport {
    pub fn packets(&self) -> usize {
        return self.dropped.len();
    }

    pub fn dropped_count(&self) -> usize {
        return self.dropped.iter().filter(|&&dropped| dropped).count();
    }
}

/// Wraps payloads in headers and strips them again.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketFramer {
    config: FrameConfig,
}

impl PacketFramer {
    pub fn new(config: FrameConfig) -> Self {
        return PacketFramer { config };
    }

    pub fn config(&self) -> &FrameConfig {
        return &self.config;
    }

    /// Writes one header for a payload of `length` bytes.
    ///
    /// # Arguments
    /// - `length`: The payload length, `0`, `1` or `8..=65535`
    /// - `output`: Where the header is written
    ///
    /// # Errors
    /// [`Error::InvalidLength`] for any other length, with nothing written.
    pub fn add_header<W: Write + ?Sized>(&self, length: usize, output: &mut W) -> Result<()> {
        validate_length(length)?;

        let header = Header::expected(&self.config, length as u16);
        output.write_all(&header.to_bytes(&self.config))?;

        return Ok(());
    }

    /// Writes a header followed by `payload`.
    pub fn write_frame<W: Write + ?Sized>(&self, payload: &[u8], output: &mut W) -> Result<()> {
        self.add_header(payload.len(), output)?;
        output.write_all(payload)?;

        return Ok(());
    }

    /// Splits a stream into frames of `length` payload bytes.
    ///
    /// The last frame is zero-padded. With `length == 0` the whole stream goes
    /// into a single jumbo frame.
    ///
    /// # Returns
    /// The number of headers written.
    pub fn frame_stream<S, W>(&self, length: usize, input: &mut S, output: &mut W) -> Result<usize>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        validate_length(length)?;

        if length == JUMBO {
            return self.frame_jumbo(input, output);
        }

        let mut payload = vec![0u8; length];
        let mut packets = 0;

        loop {
            let group = input.fill_group(&mut payload)?;
            if !self.config.padding.emits(group.read) {
                break;
            }

            self.write_frame(&payload, output)?;
            packets += 1;

            if group.ended {
                break;
            }
        }

        return Ok(packets);
    }

    fn frame_jumbo<S, W>(&self, input: &mut S, output: &mut W) -> Result<usize>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        let mut payload = Vec::new();
        while let ReadResult::Byte(value) = input.next_byte()? {
            payload.push(value);
        }

        if !self.config.padding.emits(payload.len()) {
            return Ok(0);
        }

        self.add_header(JUMBO, output)?;
        output.write_all(&payload)?;

        return Ok(1);
    }

    /// Strips the headers of `packet_count` frames of `length` payload bytes.
    ///
    /// Every frame consumes `8 + length` bytes and yields `length` bytes: the
    /// payload when the header matches the expected pattern, zeros otherwise.
    /// A stream that ends early reads as zeros, so missing frames come out
    /// dropped.
    ///
    /// # Arguments
    /// - `packet_count`: The number of frames expected, as returned by [`Self::frame_stream`]
    /// - `length`: The payload length the frames were built with
    /// - `input`: The received bytes
    /// - `output`: Where the payloads are written
    ///
    /// # Returns
    /// A [`DeframeReport`] with the dropped flag of every frame.
    ///
    /// # Errors
    /// [`Error::InvalidLength`] when `length` is not a length [`Self::frame_stream`]
    /// accepts, checked before any byte is read or written. Header content never
    /// fails the call; only the underlying source and sink can fail it after that.
    pub fn deframe_stream<S, W>(
        &self,
        packet_count: usize,
        length: usize,
        input: &mut S,
        output: &mut W,
    ) -> Result<DeframeReport>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        validate_length(length)?;

        let expected = Header::expected(&self.config, length as u16).to_bytes(&self.config);
        let mut header = [0u8; HEADER_LEN];
        let mut payload = vec![0u8; length];
        let mut report = DeframeReport {
            dropped: Vec::with_capacity(packet_count),
        };

        for packet in 0..packet_count {
            input.fill_group(&mut header)?;

            if length == JUMBO {
                payload.clear();
                while let ReadResult::Byte(value) = input.next_byte()? {
                    payload.push(value);
                }
            } else {
                input.fill_group(&mut payload)?;
            }

            let dropped = header != expected;
            if dropped {
                tracing::debug!(packet, "header mismatch, dropping payload");
                payload.fill(0);
            }

            output.write_all(&payload)?;
            report.dropped.push(dropped);
        }

        return Ok(report);
    }
}
