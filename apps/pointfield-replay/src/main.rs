//! pointfield-replay
//!
//! Feeds a recorded scenario through a pointfield engine and prints every
//! event it publishes as one JSON line on stdout. Reads the scenario from
//! the file given as the first argument, or from stdin.
//!
//! Logging goes to stderr and follows `RUST_LOG`.

mod scenario;

use std::io::Read;
use std::time::{Duration, Instant};

use pointfield_core::{Event, FnSink};
use pointfield_curves::CurveWorker;
use tracing_subscriber::EnvFilter;

use scenario::Scenario;

/// How long to wait for background curves after the last step
const CURVE_WAIT: Duration = Duration::from_secs(2);

fn print_event(event: Event) {
    match serde_json::to_string(&event) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::warn!("Could not serialize {} event: {}", event.name(), e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let json = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let scenario = Scenario::from_json(&json)?;
    tracing::debug!("Loaded scenario with {} steps", scenario.steps.len());

    let worker = scenario.curve_worker.then(CurveWorker::spawn);
    let mut engine = scenario.engine(FnSink(print_event), worker)?;

    let start = Instant::now();
    scenario.play(&mut engine, start)?;

    if scenario.curve_worker && engine.config().connections.show {
        let deadline = Instant::now() + CURVE_WAIT;
        while Instant::now() < deadline {
            if engine.tick(Instant::now()).connections_updated {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    tracing::info!(
        "Replay finished: {} selected, hovered {:?}, {} connection lines",
        engine.selection().len(),
        engine.hovered(),
        engine.connections().len()
    );
    Ok(())
}
