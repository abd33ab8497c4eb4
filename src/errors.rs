//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The interaction core itself never fails: a missed click is `None`, a failed
//! asset load is logged and the entity simply never appears. [`OrreryError`]
//! covers the fallible edges around it:
//! - Planet catalog and planet detail payloads
//! - Viewer settings
//! - Asset delivery
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, OrreryError>`.
//!
//! ```rust,ignore
//! use orrery::errors::Result;
//! use orrery::catalog::Catalog;
//!
//! fn load(json: &str) -> Result<Catalog> {
//!     Catalog::from_json(json)
//! }
//! ```

use thiserror::Error;

/// The main error type for the Orrery crate.
#[derive(Error, Debug)]
pub enum OrreryError {
    // ========================================================================
    // Catalog Errors
    // ========================================================================
    /// JSON parsing error (catalog, planet details or settings).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A catalog record carried a value that could not be interpreted.
    #[error("Invalid catalog record '{name}': {reason}")]
    InvalidRecord {
        /// Planet name of the offending record
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// The planet detail endpoint answered with an error payload.
    #[error("Planet data unavailable for '{0}'")]
    PlanetDataUnavailable(String),

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// An asset could not be loaded.
    #[error("Asset load failed for {entity}: {reason}")]
    AssetLoadFailed {
        /// Display label of the entity the asset belonged to
        entity: String,
        /// Loader-provided reason
        reason: String,
    },

    /// The asset channel was closed before the load result could be delivered.
    #[error("Asset channel disconnected")]
    AssetChannelClosed,

    // ========================================================================
    // Settings Errors
    // ========================================================================
    /// A settings value is out of its accepted range.
    #[error("Invalid setting `{field}`: {reason}")]
    InvalidSetting {
        /// Setting name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl<T> From<flume::SendError<T>> for OrreryError {
    fn from(_: flume::SendError<T>) -> Self {
        OrreryError::AssetChannelClosed
    }
}

/// Alias for `Result<T, OrreryError>`.
pub type Result<T> = std::result::Result<T, OrreryError>;
