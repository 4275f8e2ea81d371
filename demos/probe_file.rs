//! Probe an MPEG audio file and print what was found
//!
//! Usage: `cargo run --example probe_file -- FILE [OFFSET]`

use mp3sync_core::prober::probe;
use std::fs::File;
use std::io::BufReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: probe_file FILE [OFFSET]")?;
    let offset = match args.next() {
        Some(s) => s.parse()?,
        None => 0,
    };

    let mut reader = BufReader::new(File::open(&path)?);
    let result = probe(&mut reader, offset)?;

    println!("{}", path);
    println!("  {}", result.summary());
    println!("  Frame at offset:  {}", result.frame_offset);
    println!("  Channels:         {}", result.header.channels());
    println!("  Mode:             {}", result.mode());
    println!("  Frame length:     {} bytes", result.header.frame_length);
    println!("  Samples/frame:    {}", result.header.frame_sample_count);

    Ok(())
}
