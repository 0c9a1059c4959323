//! Echoes every line typed on standard input back to standard output.
//!
//! Run with: `cargo run --example echo`

use deferio::prelude::*;

#[tokio::main]
async fn main() {
    let echo = console::read_line().flat_map(console::write_line).forever();

    if let Err(error) = echo.run().await {
        eprintln!("echo terminated: {error}");
    }
}
