//! Forward error correction for a lossy, bit-error-prone link.
//!
//! - [`hamming`]: byte-parallel Hamming(7,4), one bit corrected per lane
//! - [`pack`]: UDP-like framing where a damaged header loses the whole packet
//! - [`interleave`]: spreads codewords across 7 packets against burst loss
//! - [`reed_solomon`]: (2,1) erasure code over [`gf`] for whole-packet recovery
//!
//! Every codec is a one-pass stream transform from a [`stream::ByteSource`]
//! to a [`std::io::Write`].

pub mod config;
pub mod error;
pub mod gf;
pub mod hamming;
pub mod interleave;
pub mod pack;
pub mod reed_solomon;
pub mod stream;
pub mod utils;

#[cfg(feature = "simulation")]
pub mod noise;

pub use error::{Error, Result};
