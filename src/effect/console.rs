//! Console effect primitives.
//!
//! Each function describes a standard-input/output effect as an
//! [`Action`]; nothing touches the terminal until the action is run.
//!
//! Character input via [`read_char`] uses the terminal's raw mode
//! (unbuffered, unechoed keystrokes). Raw mode is process-wide mutable
//! terminal state, so it is held behind a scoped guard that restores the
//! normal mode on every exit path, including panics.

use std::fmt::Display;
use std::io::Read;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::Action;
use super::Failure;

/// Writes a string to standard output, without a trailing newline.
///
/// The output is flushed so prompts appear before a subsequent read.
///
/// # Examples
///
/// ```rust,ignore
/// use deferio::effect::console;
///
/// console::write("Enter a number: ").run().await.unwrap();
/// ```
pub fn write(text: impl Into<String>) -> Action<()> {
    let text = text.into();
    Action::new(move || {
        let text = text.clone();
        async move {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(text.as_bytes()).await?;
            stdout.flush().await?;
            Ok(())
        }
    })
}

/// The same as [`write`], but adds a newline character.
pub fn write_line(text: impl Into<String>) -> Action<()> {
    let mut line = text.into();
    line.push('\n');
    write(line)
}

/// Writes the textual representation of a value to standard output,
/// followed by a newline.
///
/// # Examples
///
/// ```rust,ignore
/// use deferio::effect::console;
///
/// console::print(42).run().await.unwrap();
/// ```
pub fn print(value: impl Display) -> Action<()> {
    write_line(value.to_string())
}

/// Reads a line from standard input.
///
/// Trailing whitespace, including the line terminator, is trimmed.
/// Succeeds with an empty string at end of input.
///
/// # Examples
///
/// ```rust,ignore
/// use deferio::effect::console;
///
/// let line = console::read_line().run().await.unwrap();
/// ```
#[must_use]
pub fn read_line() -> Action<String> {
    Action::new(|| async {
        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        reader.read_line(&mut line).await?;
        Ok(line.trim_end().to_string())
    })
}

/// Reads a single character from standard input in raw mode.
///
/// Raw mode delivers the keystroke immediately, unbuffered and unechoed.
/// It is enabled just before the read and restored before the action
/// settles — on success, failure, and panic alike. Multi-byte UTF-8
/// sequences are read whole. Succeeds with an empty string at end of
/// input.
///
/// # Examples
///
/// ```rust,ignore
/// use deferio::effect::console;
///
/// let key = console::read_char().run().await.unwrap();
/// ```
#[must_use]
pub fn read_char() -> Action<String> {
    Action::new(|| async {
        let character = tokio::task::spawn_blocking(read_char_raw)
            .await
            .map_err(Failure::new)??;
        Ok(character)
    })
}

/// Scoped ownership of the terminal's raw-mode flag.
///
/// Dropping the guard restores the normal (cooked) mode, so the flag is
/// released on every exit path of the holder, including unwinding.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> std::io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Nothing sensible to do with a failure while restoring the mode.
        let _ = disable_raw_mode();
    }
}

fn read_char_raw() -> std::io::Result<String> {
    let _guard = RawModeGuard::acquire()?;

    let mut stdin = std::io::stdin();
    let mut first = [0_u8; 1];
    if stdin.read(&mut first)? == 0 {
        return Ok(String::new());
    }

    let width = utf8_width(first[0]);
    let mut bytes = vec![first[0]];
    if width > 1 {
        let mut rest = vec![0_u8; width - 1];
        stdin.read_exact(&mut rest)?;
        bytes.extend_from_slice(&rest);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Byte width of a UTF-8 sequence given its leading byte.
const fn utf8_width(leading: u8) -> usize {
    if leading >= 0xF0 {
        4
    } else if leading >= 0xE0 {
        3
    } else if leading >= 0xC0 {
        2
    } else {
        1
    }
}
