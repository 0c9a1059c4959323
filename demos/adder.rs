//! Repeatedly reads two numbers and prints their sum.
//!
//! Run with: `cargo run --example adder`

use deferio::prelude::*;

/// Prompts for a number and parses it.
fn get_int() -> Action<i64> {
    console::write("Enter a number: ")
        .then(console::read_line())
        .flat_map(|line| match line.trim().parse::<i64>() {
            Ok(number) => Action::pure(number),
            Err(error) => Action::fail(Failure::new(error)),
        })
}

#[tokio::main]
async fn main() {
    let add_loop = get_int()
        .map2(get_int(), |x, y| x + y)
        .flat_map(console::print)
        .forever();

    if let Err(error) = add_loop.run().await {
        eprintln!("adder terminated: {error}");
    }
}
