use anyhow::{bail, Context, Result};
use mp3sync_core::{decoder::Decoder, MpaCodec};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use tracing::{info, warn};

const READ_SIZE: usize = 64 * 1024;

pub fn execute(input: &str, output: &str) -> Result<()> {
    info!("Decoding file: {}", input);

    let file = File::open(input).with_context(|| format!("Failed to open input file: {}", input))?;
    let mut decoder = Decoder::with_codec(BufReader::new(file), MpaCodec::new());

    if !decoder.is_valid() {
        warn!("No frame header in the first chunk of {}", input);
    } else {
        info!(
            "{} channel(s), {} Hz, {} kbps",
            decoder.channels(),
            decoder.sample_rate(),
            decoder.bit_rate()
        );
    }

    let out = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output))?;
    let mut writer = BufWriter::new(out);

    let mut written = 0usize;
    loop {
        let pcm = decoder
            .read(READ_SIZE)
            .with_context(|| format!("Failed to decode {}", input))?;
        if pcm.is_empty() {
            break;
        }
        writer.write_all(&pcm)?;
        written += pcm.len();
    }
    writer.flush()?;

    let stats = decoder.stats();
    if stats.frames_decoded == 0 {
        bail!("No MPEG audio frames could be decoded from {}", input);
    }

    println!("\n=== Decode Results ===");
    println!("Frames decoded:    {}", stats.frames_decoded);
    println!("Bytes skipped:     {} bytes", stats.bytes_skipped);
    println!("Corrupted frames:  {}", stats.corrupted_frames);
    println!("Truncated frames:  {}", stats.truncated_frames);
    println!("PCM written:       {} bytes", written);

    info!("PCM written to: {}", output);

    Ok(())
}
