//! Configuration shared by the framing and coding layers.

use crate::error::{Error, Result};

/// Byte order of the 2-byte header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// High byte first (network order).
    #[default]
    BigEndian,
    /// Low byte first.
    LittleEndian,
}

impl ByteOrder {
    pub fn encode(&self, value: u16) -> [u8; 2] {
        return match self {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
    }

    pub fn decode(&self, bytes: [u8; 2]) -> u16 {
        return match self {
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
        };
    }
}

/// What a stream encoder does with a round that starts at end of stream.
///
/// A round cut short mid-group is always completed with zero padding. This
/// only decides the round in which not a single byte was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadPolicy {
    /// Emit nothing for an empty trailing round.
    #[default]
    Trim,
    /// Emit the empty trailing round as all zeros, so every input, even an
    /// exact multiple of the group size, gets one extra zero round.
    Legacy,
}

impl PadPolicy {
    /// `true` when a round that read `read` bytes should still be emitted.
    pub fn emits(&self, read: usize) -> bool {
        return read > 0 || *self == PadPolicy::Legacy;
    }
}

/// The constant header pattern written by the framer and expected by the
/// deframer.
///
/// # Fields
/// - `src_port`: Source port written in every header, `0x0000` by default
/// - `dst_port`: Destination port, `0xFFFF` (broadcast) by default
/// - `checksum`: Checksum field, `0x0000` (no checksum) by default
/// - `byte_order`: Byte order of all 2-byte fields
/// - `padding`: End of stream policy for [`crate::pack::PacketFramer::frame_stream`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    pub src_port: u16,
    pub dst_port: u16,
    pub checksum: u16,
    pub byte_order: ByteOrder,
    pub padding: PadPolicy,
}

impl Default for FrameConfig {
    fn default() -> Self {
        return FrameConfig {
            src_port: 0x0000,
            dst_port: 0xFFFF,
            checksum: 0x0000,
            byte_order: ByteOrder::default(),
            padding: PadPolicy::default(),
        };
    }
}

impl FrameConfig {
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        return self;
    }

    pub fn with_padding(mut self, padding: PadPolicy) -> Self {
        self.padding = padding;
        return self;
    }
}

/// GF(256) coefficients of the two data payloads in the parity payload.
///
/// `parity = c0 * data0 + c1 * data1`. The default `(1, 1)` makes the parity
/// the plain XOR of the two payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParityCoefficients {
    c0: u8,
    c1: u8,
}

impl ParityCoefficients {
    pub fn new(c0: u8, c1: u8) -> Result<Self> {
        if c0 == 0 || c1 == 0 {
            return Err(Error::ZeroCoefficient);
        }

        return Ok(ParityCoefficients { c0, c1 });
    }

    pub fn c0(&self) -> u8 {
        return self.c0;
    }

    pub fn c1(&self) -> u8 {
        return self.c1;
    }
}

impl Default for ParityCoefficients {
    fn default() -> Self {
        return ParityCoefficients { c0: 1, c1: 1 };
    }
}

/// How the parity payload is derived from the two data payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParityMode {
    /// `parity = c0 * data0 + c1 * data1`, invertible for any single erasure.
    Linear(ParityCoefficients),
    /// `parity = data0 * data1` in GF(256), recovered by XOR as the legacy
    /// tools did. The XOR does not undo the product, so a rebuilt payload is
    /// generally not the one that was lost.
    Product,
}

impl Default for ParityMode {
    fn default() -> Self {
        return ParityMode::Linear(ParityCoefficients::default());
    }
}
