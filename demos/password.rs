//! Reads a password character by character in raw mode, echoing `*`.
//!
//! Demonstrates `read_char` (raw-mode input with guaranteed mode
//! restoration) and `left` (keep the first value, still run the second).
//!
//! Run with: `cargo run --example password`

use deferio::prelude::*;

/// Accumulates characters until Enter, echoing a `*` per keystroke.
fn password() -> Action<String> {
    console::read_char().flat_map(|character| {
        if character.is_empty() || character == "\r" || character == "\n" {
            console::write("\n").then(Action::pure(String::new()))
        } else {
            console::write("*").then(
                Action::pure(character).map2(password(), |head, tail| format!("{head}{tail}")),
            )
        }
    })
}

#[tokio::main]
async fn main() {
    let ask_password = console::write("Enter a password: ")
        .then(password())
        .left(console::write("Your password is: "))
        .flat_map(console::write_line);

    if let Err(error) = ask_password.run().await {
        eprintln!("password prompt failed: {error}");
    }
}
