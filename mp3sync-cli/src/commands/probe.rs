use anyhow::{bail, Context, Result};
use colored::*;
use mp3sync_core::{prober::probe, Mp3Error, ProbeResult};
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufReader;
use tracing::{info, warn};

pub fn execute(input: &str, offset: u64, json: bool) -> Result<()> {
    println!("{}", report(input, offset, json)?);
    Ok(())
}

/// Probe `input` and render the result, failing when no audio is found
pub fn report(input: &str, offset: u64, json: bool) -> Result<String> {
    info!("Probing file: {} (offset {})", input, offset);

    let file = File::open(input).with_context(|| format!("Failed to open input file: {}", input))?;
    let mut reader = BufReader::new(file);

    let result = match probe(&mut reader, offset) {
        Ok(result) => result,
        Err(Mp3Error::HeaderNotFound) => {
            bail!("{} No MPEG audio frames found in {}", "✗".red(), input)
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to probe {}", input)),
    };

    if result.sketchy {
        warn!("Frame at {} could not be confirmed", result.frame_offset);
    }

    if json {
        serde_json::to_string_pretty(&result).with_context(|| "Failed to serialize probe result")
    } else {
        Ok(render_text(&result))
    }
}

/// Multi-line human readable report
pub fn render_text(result: &ProbeResult) -> String {
    let mark = if result.sketchy {
        "?".yellow()
    } else {
        "✓".green()
    };

    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "{} {}", mark, result.summary());
    let _ = writeln!(out, "Frame offset:      {}", result.frame_offset);
    let _ = writeln!(out, "Channels:          {}", result.header.channels());
    let _ = writeln!(out, "Mode:              {}", result.mode());
    let _ = writeln!(out, "Frame length:      {} bytes", result.header.frame_length);
    let _ = write!(out, "File size:         {} bytes", result.file_size);
    out
}
