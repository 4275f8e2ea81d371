//! Example demonstrating recovery from damaged data

use mp3sync_core::{decoder::Decoder, encoder::Encoder, scanner::scan_stream_with_stats};
use std::io::Cursor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("mp3sync Damaged Stream Recovery Example\n");

    // Step 1: Encode two seconds of silence
    println!("Step 1: Encoding 2 seconds of 44.1 kHz stereo silence...");
    let mut encoder = Encoder::new();
    encoder.write(&vec![0u8; 44100 * 2 * 2 * 2])?;
    encoder.flush()?;
    let mut stream = encoder.take_output().to_vec();

    let (clean_frames, _) = scan_stream_with_stats(&stream);
    println!(
        "Created clean stream: {} bytes, {} frames\n",
        stream.len(),
        clean_frames.len()
    );

    // Step 2: Simulate damage
    println!("Step 2: Simulating damage...");

    // Wipe bytes 1000-1600
    for b in &mut stream[1000..1600] {
        *b = 0x00;
    }
    println!("  - Zeroed bytes 1000-1600");

    // Flip bits in a header further on
    let at = clean_frames[20].offset;
    stream[at + 1] ^= 0xE0;
    println!("  - Corrupted header of frame 20 at offset {}", at);

    // Insert garbage
    stream.splice(5000..5000, b"GARBAGE DATA INSERTED HERE".iter().copied());
    println!("  - Inserted 26 bytes of garbage at 5000\n");

    // Step 3: Walk the damaged stream
    println!("Step 3: Scanning for surviving frames...");
    let (located, stats) = scan_stream_with_stats(&stream);

    println!("Scan Results:");
    println!("  Bytes scanned:  {}", stats.bytes_scanned);
    println!("  Frames found:   {}", stats.frames_found);
    println!("  Bytes skipped:  {}", stats.bytes_skipped);
    println!("  Recovery rate:  {:.1}%\n", stats.recovery_rate());

    if let Some(first) = located.first() {
        println!(
            "  First frame at offset {} ({} bytes, {} Hz)",
            first.offset, first.size, first.header.sample_rate
        );
    }

    // Step 4: Decode through the damage
    println!("\nStep 4: Decoding...");
    let mut decoder = Decoder::new(Cursor::new(stream));
    let mut pcm_bytes = 0;
    loop {
        let pcm = decoder.read(16384)?;
        if pcm.is_empty() {
            break;
        }
        pcm_bytes += pcm.len();
    }

    let stats = decoder.stats();
    println!("  Frames decoded: {}", stats.frames_decoded);
    println!("  Bytes skipped:  {}", stats.bytes_skipped);
    println!(
        "  PCM produced:   {} bytes ({:.2} s)",
        pcm_bytes,
        pcm_bytes as f64 / (44100.0 * 4.0)
    );

    println!("\nRecovery complete!");

    Ok(())
}
