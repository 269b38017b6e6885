//! Command implementations for the `rota` binary.

pub mod config;
pub mod key;
pub mod optimize;
pub(crate) mod store;
pub(crate) mod theme;

/// Treat Ctrl-C at a prompt as a cancel instead of an error.
pub(crate) fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}
