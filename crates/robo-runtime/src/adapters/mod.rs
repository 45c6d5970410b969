//! Adapters shipped with the runtime.

#[cfg(feature = "shell")]
pub mod shell;

#[cfg(feature = "shell")]
pub use shell::{ShellAdapter, ShellConfig};
