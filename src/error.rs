/// Crate-level error types for linkfield diagnostics.
use std::path::PathBuf;

/// Errors that stop an operation. Link values that cannot produce a usable
/// href or that fail validation are not errors; those degrade to `#` or to a
/// `ValidationFailure`. Each variant names the file or type it concerns.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported as linkfield::Error")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two custom link types share the same `value`.
    #[error("duplicate custom link type: `{value}`")]
    DuplicateLinkType {
        /// The repeated type value.
        value: String,
    },

    /// An input file named on the command line does not exist.
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

    /// A JSON document or link value could not be parsed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A dynamic options provider for a custom link type failed.
    #[error("options for link type `{link_type}` failed: {reason}")]
    OptionsFailed {
        /// Custom link type whose options were requested.
        link_type: String,
        /// Description of the failure reported by the provider.
        reason: String,
    },

    /// A custom link type reuses one of the reserved built-in type names.
    #[error("custom link type `{value}` collides with a built-in link type")]
    ReservedLinkType {
        /// The offending type value.
        value: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A link type name in the configuration is not a built-in type.
    #[error("unknown built-in link type: `{name}`")]
    UnknownLinkType {
        /// The name that did not match any built-in type.
        name: String,
    },
}
