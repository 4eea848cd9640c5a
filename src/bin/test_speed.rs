use linkfec::hamming::HammingCodec;
use tracing_subscriber::EnvFilter;

fn main() -> linkfec::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let start = std::time::Instant::now();
    let duration = std::time::Duration::from_secs(1);
    let codec = HammingCodec::default();
    let mut rounds: u64 = 0;

    // Pre-allocate buffers
    const BUFFER_SIZE: usize = 1024;
    let mut data_buffer = [0u8; BUFFER_SIZE];
    let hello_bytes = b"hello world";
    data_buffer[..hello_bytes.len()].copy_from_slice(hello_bytes);

    let mut encoded = Vec::with_capacity(BUFFER_SIZE / 4 * 7);
    let mut decoded = Vec::with_capacity(BUFFER_SIZE);

    loop {
        if start.elapsed() >= duration {
            break;
        }

        encoded.clear();
        decoded.clear();

        codec.encode(&mut &data_buffer[..], &mut encoded)?;
        // one flipped bit per codeword keeps the corrector busy
        for codeword in encoded.chunks_mut(7) {
            codeword[(rounds % 7) as usize] ^= 1 << (rounds % 8);
        }
        let report = codec.decode(&mut &encoded[..], &mut decoded)?;

        if report.uncorrectable_lanes == 0 && decoded[..] == data_buffer[..] {
            rounds += 1;
        }
    }

    println!("{} buffers/second", rounds);
    print_throughput(rounds * BUFFER_SIZE as u64);

    return Ok(());
}

fn print_throughput(bytes: u64) {
    match () {
        _ if bytes >= 1_000_000 => println!("{:.2} mb/s", bytes as f64 / 1_000_000.0),
        _ if bytes >= 1_000 => println!("{:.2} kb/s", bytes as f64 / 1_000.0),
        _ => println!("{:.2} b/s", bytes as f64),
    }
}
