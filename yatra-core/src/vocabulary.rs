//! Closed vocabularies describing what kind of destination a record is.
//!
//! Both dimensions decode leniently: values outside the vocabulary become
//! `Uncategorized` rather than failing, so a catalog row with a new or
//! misspelt value still renders and filters.
//!
//! # Examples
//! ```
//! use yatra_core::{Category, PlaceType};
//!
//! assert_eq!(Category::from_wire("monasteries"), Category::Monastery);
//! assert_eq!(PlaceType::from_wire("lake").as_str(), "lake");
//! assert_eq!(PlaceType::from_wire("volcano"), PlaceType::Uncategorized);
//! ```

macro_rules! closed_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $wire:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(from = "String", into = "&'static str")
        )]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
            /// Any value outside the closed vocabulary.
            Uncategorized,
        }

        impl $name {
            /// Every known variant, in declaration order.
            pub const KNOWN: &'static [Self] = &[$(Self::$variant),+];

            /// Return the canonical wire name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Uncategorized => "uncategorized",
                }
            }

            /// Decode a wire value, mapping unknown input to `Uncategorized`.
            ///
            /// Matching ignores case and surrounding whitespace.
            pub fn from_wire(raw: &str) -> Self {
                match raw.trim().to_ascii_lowercase().as_str() {
                    $($wire $(| $alias)* => Self::$variant,)+
                    _ => Self::Uncategorized,
                }
            }

            /// Whether the value belongs to the closed vocabulary.
            pub const fn is_known(self) -> bool {
                !matches!(self, Self::Uncategorized)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                let decoded = Self::from_wire(&raw);
                if !decoded.is_known() && raw.trim() != "uncategorized" {
                    log::warn!(
                        "unknown {} value '{raw}', treating as uncategorized",
                        stringify!($name)
                    );
                }
                decoded
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }
    };
}

closed_vocabulary! {
    /// Broad catalog section a destination belongs to.
    ///
    /// The backend historically used plural spellings (`hotels`,
    /// `monasteries`, `culture_festivals`); those decode to the matching
    /// singular variant.
    Category {
        /// Places to stay.
        Hotel => "hotel" | "hotels",
        /// General sightseeing spots.
        TouristSpot => "tourist_spot" | "tourist_spots",
        /// Monasteries and gompas.
        Monastery => "monastery" | "monasteries",
        /// Lakes, parks, falls and other natural attractions.
        NaturePoint => "nature_point" | "nature_points",
        /// Festivals and seasonal celebrations.
        Festival => "festival" | "festivals" | "culture_festivals",
        /// Heritage and cultural sites.
        CulturalSite => "cultural_site" | "cultural_sites" | "cultural",
    }
}

closed_vocabulary! {
    /// Physical kind of place.
    PlaceType {
        /// Peaks and passes.
        Mountain => "mountain",
        /// Monastery buildings.
        Monastery => "monastery",
        /// Lakes.
        Lake => "lake",
        /// Viewpoints.
        Viewpoint => "viewpoint",
        /// Parks and gardens.
        Park => "park",
        /// Festival grounds.
        Festival => "festival",
        /// Hotels.
        Hotel => "hotel",
        /// Temples.
        Temple => "temple",
        /// Waterfalls.
        Waterfall => "waterfall",
        /// Trekking routes.
        Trek => "trek",
        /// Villages.
        Village => "village",
    }
}
