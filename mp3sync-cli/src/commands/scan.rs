use anyhow::{Context, Result};
use mp3sync_core::scanner::scan_stream_with_stats;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

#[derive(Serialize, Deserialize)]
struct LocatedFrameRecord {
    offset: usize,
    header: String,
    size: usize,
    version: f32,
    layer: u8,
    bitrate: u32,
    sample_rate: u32,
    mode: u8,
}

pub fn execute(input: &str, output: Option<&str>, stats_only: bool) -> Result<()> {
    info!("Scanning file: {}", input);

    // Read input file
    let data = fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    info!("File size: {} bytes", data.len());

    // Walk the stream
    let (located_frames, stats) = scan_stream_with_stats(&data);

    let duration: f64 = located_frames.iter().map(|lf| lf.header.duration()).sum();

    // Print statistics
    println!("\n=== Scan Results ===");
    println!("Bytes scanned:     {} bytes", stats.bytes_scanned);
    println!("Frames found:      {}", stats.frames_found);
    println!("Truncated frames:  {}", stats.truncated_frames);
    println!("Bytes skipped:     {} bytes", stats.bytes_skipped);
    println!("Bytes recovered:   {} bytes", stats.bytes_recovered);
    println!("Recovery rate:     {:.2}%", stats.recovery_rate());
    println!("Audio duration:    {:.2} s", duration);
    println!();

    if stats_only {
        return Ok(());
    }

    let records: Vec<LocatedFrameRecord> = located_frames
        .iter()
        .map(|lf| LocatedFrameRecord {
            offset: lf.offset,
            header: hex::encode(lf.header.to_bytes()),
            size: lf.size,
            version: lf.header.version.as_f32(),
            layer: lf.header.layer.number(),
            bitrate: lf.header.bitrate,
            sample_rate: lf.header.sample_rate,
            mode: lf.header.channel_mode.code(),
        })
        .collect();

    if let Some(output_path) = output {
        // Write to JSON file
        let json = serde_json::to_string_pretty(&records)
            .with_context(|| "Failed to serialize located frames")?;

        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Located frames written to: {}", output_path);
    } else {
        println!("=== Located Frames ===");
        for record in &records {
            println!(
                "Frame @ offset {}: header {} ({} bytes)",
                record.offset, record.header, record.size
            );
        }
    }

    Ok(())
}
