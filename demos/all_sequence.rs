//! Contrasts concurrent (`all`) and ordered (`sequence`) evaluation.
//!
//! Each task waits a little over two seconds, then prints its tag. Under
//! `all` the waits overlap, so the batch finishes in roughly the longest
//! single wait; under `sequence` the waits add up.
//!
//! Run with: `cargo run --example all_sequence`

use std::time::Duration;

use deferio::prelude::*;

fn task(tag: i32) -> Action<()> {
    Action::delay(Duration::from_millis(10 * u64::try_from(tag).unwrap_or(0) + 2000))
        .then(console::print(tag))
}

#[tokio::main]
async fn main() {
    let tasks = || vec![task(1), task(2), task(3)];

    let concurrent = console::write_line("all").then(Action::all(tasks()).ignore());
    let ordered = console::write_line("sequence").then(Action::sequence(tasks()).ignore());

    if let Err(error) = concurrent.then(ordered).run().await {
        eprintln!("demo failed: {error}");
    }
}
