//! File effect primitives.
//!
//! Each function describes a file-system effect as an [`Action`]; nothing
//! touches the disk until the action is run. All contents are UTF-8 text,
//! and I/O errors surface through the action's failure channel.

use std::path::PathBuf;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::Action;

/// Reads a file and succeeds with its contents as a UTF-8 string.
///
/// Fails if the file does not exist, cannot be read, or is not valid
/// UTF-8.
///
/// # Examples
///
/// ```rust,ignore
/// use deferio::effect::file;
///
/// let contents = file::read_file("notes.txt").run().await.unwrap();
/// ```
pub fn read_file(path: impl Into<PathBuf>) -> Action<String> {
    let path = path.into();
    Action::new(move || {
        let path = path.clone();
        async move { Ok(tokio::fs::read_to_string(path).await?) }
    })
}

/// Writes a string to a file, creating it or overwriting any existing
/// contents.
///
/// # Examples
///
/// ```rust,ignore
/// use deferio::effect::file;
///
/// file::write_file("notes.txt", "fresh contents").run().await.unwrap();
/// ```
pub fn write_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Action<()> {
    let path = path.into();
    let content = content.into();
    Action::new(move || {
        let path = path.clone();
        let content = content.clone();
        async move {
            tokio::fs::write(path, content.as_bytes()).await?;
            Ok(())
        }
    })
}

/// Appends a string to the end of a file, creating the file if it does
/// not exist.
///
/// # Examples
///
/// ```rust,ignore
/// use deferio::effect::file;
///
/// file::append_file("log.txt", "one more line\n").run().await.unwrap();
/// ```
pub fn append_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Action<()> {
    let path = path.into();
    let content = content.into();
    Action::new(move || {
        let path = path.clone();
        let content = content.clone();
        async move {
            let mut file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .await?;
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;
            Ok(())
        }
    })
}
