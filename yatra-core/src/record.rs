//! Destination records as held by the catalog.

use std::borrow::Borrow;
use std::fmt;

use crate::{Category, PlaceType};

/// Highest rating a destination can carry.
pub const MAX_RATING: f32 = 5.0;

/// Opaque, unique identifier of a destination record.
///
/// # Examples
/// ```
/// use yatra_core::RecordId;
///
/// let id = RecordId::new("rumtek");
/// assert_eq!(id.as_str(), "rumtek");
/// assert_eq!(id.to_string(), "rumtek");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// A hotel, place or viewpoint listed in the catalog.
///
/// Optional text fields stay `None` when the source omits them; list fields
/// default to empty and the rating to `0.0` (unrated).
///
/// # Examples
/// ```
/// use yatra_core::{Category, DestinationRecord, PlaceType};
///
/// let record = DestinationRecord::new("tsomgo", "Tsomgo Lake", Category::NaturePoint, PlaceType::Lake)
///     .with_rating(4.2)
///     .with_features(["Frozen in winter", "Yak rides"]);
///
/// assert_eq!(record.id.as_str(), "tsomgo");
/// assert_eq!(record.features.len(), 2);
/// assert!(record.address.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestinationRecord {
    /// Unique identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "wire::null_as_default"))]
    pub description: String,
    /// Catalog section.
    pub category: Category,
    /// Physical kind of place.
    pub place_type: PlaceType,
    /// Street or area address.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
    /// Rating in `0.0..=MAX_RATING`; `0.0` means unrated.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "wire::rating"))]
    pub rating: f32,
    /// Ordered feature tags, e.g. "Prayer wheels".
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "wire::null_as_default"))]
    pub features: Vec<String>,
    /// Whether the record is promoted to the top of the catalog.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "wire::null_as_default"))]
    pub is_featured: bool,
    /// Altitude in metres.
    #[cfg_attr(feature = "serde", serde(default))]
    pub altitude: Option<f64>,
    /// Human readable price band.
    #[cfg_attr(feature = "serde", serde(default))]
    pub price_range: Option<String>,
    /// Recommended season.
    #[cfg_attr(feature = "serde", serde(default))]
    pub best_time_to_visit: Option<String>,
    /// WGS84 latitude.
    #[cfg_attr(feature = "serde", serde(default))]
    pub latitude: Option<f64>,
    /// WGS84 longitude.
    #[cfg_attr(feature = "serde", serde(default))]
    pub longitude: Option<f64>,
    /// Image URLs, first one is the cover.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "wire::null_as_default"))]
    pub images: Vec<String>,
    /// Trek or access difficulty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub difficulty_level: Option<String>,
    /// Phone or email contact.
    #[cfg_attr(feature = "serde", serde(default))]
    pub contact_info: Option<String>,
    /// Website URL.
    #[cfg_attr(feature = "serde", serde(default))]
    pub website: Option<String>,
}

impl DestinationRecord {
    /// Construct an unrated, unfeatured record with no optional details.
    pub fn new(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        category: Category,
        place_type: PlaceType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            place_type,
            address: None,
            rating: 0.0,
            features: Vec::new(),
            is_featured: false,
            altitude: None,
            price_range: None,
            best_time_to_visit: None,
            latitude: None,
            longitude: None,
            images: Vec::new(),
            difficulty_level: None,
            contact_info: None,
            website: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the rating, clamped into `0.0..=MAX_RATING`.
    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = clamp_rating(rating);
        self
    }

    /// Replace the feature tags.
    #[must_use]
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the record as featured.
    #[must_use]
    pub fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }

    /// Set the altitude in metres.
    #[must_use]
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Whether the record has a non-zero rating.
    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }
}

/// Clamp a raw rating into `0.0..=MAX_RATING`, mapping NaN to unrated.
pub(crate) fn clamp_rating(raw: f32) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, MAX_RATING)
}

#[cfg(feature = "serde")]
mod wire {
    use serde::{Deserialize, Deserializer};

    pub(super) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub(super) fn rating<'de, D>(deserializer: D) -> Result<f32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<f32>::deserialize(deserializer)?.unwrap_or(0.0);
        Ok(super::clamp_rating(raw))
    }
}
