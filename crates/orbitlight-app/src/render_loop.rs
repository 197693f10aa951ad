//! Render loop — receives published positions and streams them as frames.
//!
//! The simulator ticks on its own timer thread. Positions arrive here via
//! an `mpsc` channel and are written as one JSON `LightFrame` per line,
//! the way a renderer would push them into a lighting uniform.

use std::io::Write;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};

use orbitlight_core::config::OrbitConfig;
use orbitlight_core::state::LightFrame;
use orbitlight_core::types::Vector3;
use orbitlight_sim::LightSimulator;

use crate::args::RunOptions;

/// Run a simulator for the configured window, writing each frame to `out`.
///
/// Returns the number of frames written.
pub fn run<W: Write>(config: OrbitConfig, options: &RunOptions, out: &mut W) -> Result<u64> {
    let simulator = LightSimulator::try_new(config).context("invalid orbit configuration")?;

    let (frame_tx, frame_rx) = mpsc::channel::<Vector3>();
    let frame_tx = Mutex::new(frame_tx);
    simulator.on_position_change(move |position| {
        if let Ok(tx) = frame_tx.lock() {
            let _ = tx.send(position);
        }
    });

    let deadline = Instant::now() + options.duration;
    let mut written = 0u64;

    simulator.start();
    let result = stream_frames(&frame_rx, deadline, options.max_frames, out, &mut written);
    simulator.stop();
    result?;

    out.flush().context("flushing frame output")?;
    Ok(written)
}

fn stream_frames<W: Write>(
    frame_rx: &mpsc::Receiver<Vector3>,
    deadline: Instant,
    max_frames: Option<u64>,
    out: &mut W,
    written: &mut u64,
) -> Result<()> {
    loop {
        if max_frames.is_some_and(|max| *written >= max) {
            return Ok(());
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        let position = match frame_rx.recv_timeout(remaining) {
            Ok(position) => position,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                return Ok(());
            }
        };

        *written += 1;
        let frame = LightFrame {
            tick: *written,
            position,
        };
        serde_json::to_writer(&mut *out, &frame).context("writing frame")?;
        writeln!(out).context("writing frame")?;
    }
}
