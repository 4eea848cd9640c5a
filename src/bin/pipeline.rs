use std::error::Error;
use std::fs;

use linkfec::hamming::HammingCodec;
use linkfec::interleave::Interleaver;
use linkfec::noise::invert_every;
use linkfec::pack::PacketFramer;
use linkfec::reed_solomon::ReedSolomon;
use linkfec::utils::count_byte_differences;
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: pipeline <hamming|interleaved|rs> <input> <output> [payload_length] [noise_stride]";
const DEFAULT_PAYLOAD_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy)]
enum Mode {
    Hamming,
    Interleaved,
    ReedSolomon,
}

impl Mode {
    fn parse(name: &str) -> Option<Self> {
        return match name {
            "hamming" => Some(Mode::Hamming),
            "interleaved" => Some(Mode::Interleaved),
            "rs" => Some(Mode::ReedSolomon),
            _ => None,
        };
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 || args.len() > 5 {
        return Err(USAGE.into());
    }

    let mode = Mode::parse(&args[0]).ok_or(USAGE)?;
    let payload_length = match args.get(3) {
        Some(value) => value.parse()?,
        None => DEFAULT_PAYLOAD_LENGTH,
    };
    let noise_stride: Option<usize> = match args.get(4) {
        Some(value) => Some(value.parse()?),
        None => None,
    };

    let data = fs::read(&args[1])?;
    let mut decoded = run(mode, payload_length, noise_stride, &data)?;

    // padding added on the way out is not part of the message
    decoded.truncate(data.len());
    fs::write(&args[2], &decoded)?;

    let differences = count_byte_differences(&mut &decoded[..], &mut &data[..])?;
    tracing::info!(bytes = data.len(), differences, "pipeline finished");
    println!("{} of {} bytes differ", differences, data.len());

    return Ok(());
}

/// Applies the channel, or copies the stream untouched when no stride is given.
fn channel(noise_stride: Option<usize>, wire: &[u8]) -> linkfec::Result<Vec<u8>> {
    let mut received = Vec::with_capacity(wire.len());
    match noise_stride {
        Some(stride) => {
            let inverted = invert_every(stride, &mut &wire[..], &mut received)?;
            tracing::info!(stride, inverted, "channel noise applied");
        }
        None => received.extend_from_slice(wire),
    }
    return Ok(received);
}

fn run(
    mode: Mode,
    payload_length: usize,
    noise_stride: Option<usize>,
    data: &[u8],
) -> linkfec::Result<Vec<u8>> {
    let framer = PacketFramer::default();
    let codec = HammingCodec::default();

    let mut encoded = Vec::new();
    let mut wire = Vec::new();
    let mut payloads = Vec::new();
    let mut decoded = Vec::new();

    match mode {
        Mode::Hamming => {
            let codewords = codec.encode(&mut &data[..], &mut encoded)?;
            let packets = framer.frame_stream(payload_length, &mut &encoded[..], &mut wire)?;
            tracing::info!(codewords, packets, "encoded");

            let received = channel(noise_stride, &wire)?;
            let report =
                framer.deframe_stream(packets, payload_length, &mut &received[..], &mut payloads)?;
            tracing::info!(dropped = report.dropped_count(), "deframed");

            let report = codec.decode(&mut &payloads[..], &mut decoded)?;
            tracing::info!(?report, "decoded");
        }
        Mode::Interleaved => {
            let interleaver = Interleaver::default();

            let codewords = codec.encode(&mut &data[..], &mut encoded)?;
            let summary = interleaver.interleave_hamming(
                &framer,
                payload_length,
                &mut &encoded[..],
                &mut wire,
            )?;
            tracing::info!(codewords, ?summary, "encoded");

            let received = channel(noise_stride, &wire)?;
            let report = framer.deframe_stream(
                summary.packets,
                payload_length,
                &mut &received[..],
                &mut payloads,
            )?;
            tracing::info!(dropped = report.dropped_count(), "deframed");

            let mut restored = Vec::new();
            interleaver.deinterleave_hamming(payload_length, &mut &payloads[..], &mut restored)?;
            let report = codec.decode(&mut &restored[..], &mut decoded)?;
            tracing::info!(?report, "decoded");
        }
        Mode::ReedSolomon => {
            let rs = ReedSolomon::default();

            let blocks = rs.encode(payload_length, &mut &data[..], &mut encoded)?;
            let packets = framer.frame_stream(payload_length, &mut &encoded[..], &mut wire)?;
            tracing::info!(blocks, packets, "encoded");

            let received = channel(noise_stride, &wire)?;
            let report =
                framer.deframe_stream(packets, payload_length, &mut &received[..], &mut payloads)?;
            tracing::info!(dropped = report.dropped_count(), "deframed");

            let recovery = rs.decode_with_erasures(
                payload_length,
                &report.dropped,
                &mut &payloads[..],
                &mut decoded,
            )?;
            tracing::info!(?recovery, "decoded");
        }
    }

    return Ok(decoded);
}
