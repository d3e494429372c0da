//! Error Types
//!
//! Everything the core can refuse or fail at. None of these are fatal to the
//! process: the controller reports them to the surface and keeps running.

use thiserror::Error;

use crate::controller::Screen;
use crate::store::kv::StoreError;

/// Errors produced by the session controller and the entry store
#[derive(Debug, Error)]
pub enum GardenError {
    /// The candidate passphrase is not one of the accepted keys
    #[error("that doesn't seem to be the right key to the garden")]
    InvalidPassphrase,

    /// The active buffer was empty or whitespace only
    #[error("nothing to save")]
    NothingToSave,

    /// An import payload did not have the expected shape
    #[error("malformed import: {0}")]
    MalformedImport(String),

    /// The durable key-value store could not be read or written
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),

    /// A flip was requested while another flip is still settling
    #[error("a penny is already in the air")]
    FlipInProgress,

    /// The action does not apply to the current screen or mode
    #[error("{action} is not available on the {screen} screen")]
    NotAvailable {
        /// Name of the rejected action
        action: &'static str,
        /// Screen the controller was on
        screen: Screen,
    },
}

impl GardenError {
    /// Whether the error is a user-facing refusal rather than a failure
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Self::InvalidPassphrase
                | Self::NothingToSave
                | Self::FlipInProgress
                | Self::NotAvailable { .. }
        )
    }
}
