//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `chime_core` linkage.
//! - Run one end-to-end toggle round against the in-memory scheduler and
//!   store, with deterministic output for quick local sanity checks.

use chime_core::{ChimeService, MemoryScheduler, SqliteKeyValueStore};
use std::error::Error;

fn main() {
    println!("chime_core ping={}", chime_core::ping());
    println!("chime_core version={}", chime_core::core_version());

    if let Err(err) = smoke() {
        eprintln!("smoke round failed: {err}");
        std::process::exit(1);
    }
}

fn smoke() -> Result<(), Box<dyn Error>> {
    let store = SqliteKeyValueStore::in_memory()?;
    let mut service = ChimeService::load(MemoryScheduler::new(), store);

    service.toggle_day(1)?;
    service.toggle_day(5)?;
    let outcome = service.toggle_hour(9)?;

    let slot = outcome.snapshot.slot(9)?;
    println!(
        "slot9 enabled={} days={:?} scheduled={} failed={} persisted={}",
        slot.enabled,
        slot.scheduled_days(),
        outcome.scheduled,
        outcome.failures.len(),
        outcome.persisted
    );
    Ok(())
}
