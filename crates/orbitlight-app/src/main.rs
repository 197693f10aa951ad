//! orbitlight: stream orbiting light positions as JSON lines.
//!
//! Usage:
//!   orbitlight --duration-ms 5000
//!   orbitlight --config orbit.json --max-frames 120
//!   orbitlight --print-config > orbit.json

use std::io::{self, Write};

use anyhow::{Context, Result};

use orbitlight_app::args::{self, RunOptions};
use orbitlight_app::render_loop;

fn main() -> Result<()> {
    env_logger::init();

    let argv: Vec<String> = std::env::args().collect();
    if argv.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let options = RunOptions::from_args(argv)?;
    let config = args::load_config(options.config_path.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if options.print_config {
        serde_json::to_writer_pretty(&mut out, &config).context("writing configuration")?;
        writeln!(out)?;
        return Ok(());
    }

    let frames = render_loop::run(config, &options, &mut out)?;
    log::info!("streamed {frames} frames");
    Ok(())
}

fn print_usage() {
    eprintln!(
        "orbitlight: ORBITLIGHT light-position streamer\n\
         \n\
           --config <path>      JSON orbit configuration (missing fields use defaults)\n\
           --duration-ms <N>    Wall-clock run time (default: 2000)\n\
           --max-frames <N>     Stop after N frames (optional)\n\
           --print-config       Print the effective configuration and exit\n\
         \n\
         Set RUST_LOG=debug for lifecycle logging.\n"
    );
}
