/// Crate-level error types for luadoc.
use std::path::PathBuf;

/// All errors in luadoc carry enough context to produce a useful message
/// without a debugger. Diagnostics raised during resolution are not errors;
/// they travel through the `Diagnostic` channel instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced source file or directory does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Catalog serialization failed.
    #[error("json serialize: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// The configured source directory contains no Luau files.
    #[error("no source files under {}", dir.display())]
    NoSources {
        /// The directory that was scanned.
        dir: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
