//! Transient user-facing messages produced by catalog operations.

use std::fmt;

use crate::{FavoriteChange, FetchError, ToggleError};

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Severity {
    /// Confirmation of something that worked.
    Info,
    /// Something failed; the state shown is still consistent.
    Error,
}

/// A short message for the presentation layer to show as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notice {
    /// Headline.
    pub title: String,
    /// Optional second line.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    /// Presentation hint.
    pub severity: Severity,
}

impl Notice {
    fn new(title: &str, description: Option<&str>, severity: Severity) -> Self {
        Self {
            title: title.to_owned(),
            description: description.map(str::to_owned),
            severity,
        }
    }

    /// A favorite was added.
    pub fn favorite_added() -> Self {
        Self::new("Added to favorites", None, Severity::Info)
    }

    /// A favorite was removed.
    pub fn favorite_removed() -> Self {
        Self::new("Removed from favorites", None, Severity::Info)
    }

    /// A favorite toggle was attempted without a signed-in user.
    pub fn login_required() -> Self {
        Self::new(
            "Login Required",
            Some("Please login to save favorites"),
            Severity::Error,
        )
    }

    /// A favorite write failed and was rolled back.
    pub fn favorites_update_failed() -> Self {
        Self::new("Error", Some("Failed to update favorites"), Severity::Error)
    }

    /// The signed-in user's favorites could not be read.
    pub fn favorites_load_failed() -> Self {
        Self::new("Error", Some("Could not load your favorites"), Severity::Error)
    }

    /// The destination catalog could not be read.
    pub fn catalog_load_failed() -> Self {
        Self::new("Error", Some("Could not load destinations"), Severity::Error)
    }

    /// Notice for the outcome of a favorite toggle.
    pub fn for_toggle(outcome: &Result<FavoriteChange, ToggleError>) -> Self {
        match outcome {
            Ok(change) => Self::from(*change),
            Err(err) => Self::from(err),
        }
    }

    /// Whether this notice reports a failure.
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl From<FavoriteChange> for Notice {
    fn from(change: FavoriteChange) -> Self {
        match change {
            FavoriteChange::Added => Self::favorite_added(),
            FavoriteChange::Removed => Self::favorite_removed(),
        }
    }
}

impl From<&ToggleError> for Notice {
    fn from(err: &ToggleError) -> Self {
        match err {
            ToggleError::AuthRequired => Self::login_required(),
            ToggleError::Sync { .. } => Self::favorites_update_failed(),
        }
    }
}

impl From<&FetchError> for Notice {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Records(_) => Self::catalog_load_failed(),
            FetchError::Favorites { .. } => Self::favorites_load_failed(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)?;
        if let Some(description) = &self.description {
            write!(f, ": {description}")?;
        }
        Ok(())
    }
}
