//! Concrete record types for the lodging domain.
//!
//! Each type carries a flattened [`RecordMeta`] block plus its own fields.
//! `new()` assigns fresh metadata and empty/zero domain fields; hydration
//! from a field-map goes through [`crate::from_fields`] and reuses the
//! stored identity verbatim. Cross-references between types (`state_id`,
//! `city_id`, ...) are plain id strings; the store does not resolve them.

use serde::{Deserialize, Serialize};

use crate::meta::RecordMeta;
use crate::record::Model;

macro_rules! impl_model {
    ($ty:ident) => {
        impl Model for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn meta(&self) -> &RecordMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut RecordMeta {
                &mut self.meta
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// An account that owns places and writes reviews.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    /// New user with fresh metadata and empty profile fields.
    pub fn new() -> Self {
        Self {
            meta: RecordMeta::generate(),
            email: String::new(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }
}

impl_model!(User);

/// A top-level geographic region.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct State {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default)]
    pub name: String,
}

impl State {
    pub fn new() -> Self {
        Self {
            meta: RecordMeta::generate(),
            name: String::new(),
        }
    }
}

impl_model!(State);

/// A city within a state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct City {
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Id of the owning [`State`].
    #[serde(default)]
    pub state_id: String,
    #[serde(default)]
    pub name: String,
}

impl City {
    pub fn new() -> Self {
        Self {
            meta: RecordMeta::generate(),
            state_id: String::new(),
            name: String::new(),
        }
    }
}

impl_model!(City);

/// A bookable feature (wifi, parking, ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Amenity {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default)]
    pub name: String,
}

impl Amenity {
    pub fn new() -> Self {
        Self {
            meta: RecordMeta::generate(),
            name: String::new(),
        }
    }
}

impl_model!(Amenity);

/// A listed property.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Id of the [`City`] this place is in.
    #[serde(default)]
    pub city_id: String,
    /// Id of the owning [`User`].
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub number_rooms: i64,
    #[serde(default)]
    pub number_bathrooms: i64,
    #[serde(default)]
    pub max_guest: i64,
    #[serde(default)]
    pub price_by_night: i64,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Ids of the [`Amenity`] records this place offers.
    #[serde(default)]
    pub amenity_ids: Vec<String>,
}

impl Place {
    pub fn new() -> Self {
        Self {
            meta: RecordMeta::generate(),
            city_id: String::new(),
            user_id: String::new(),
            name: String::new(),
            description: String::new(),
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: 0.0,
            longitude: 0.0,
            amenity_ids: Vec::new(),
        }
    }
}

impl_model!(Place);

/// A user's review of a place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Id of the reviewed [`Place`].
    #[serde(default)]
    pub place_id: String,
    /// Id of the authoring [`User`].
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

impl Review {
    pub fn new() -> Self {
        Self {
            meta: RecordMeta::generate(),
            place_id: String::new(),
            user_id: String::new(),
            text: String::new(),
        }
    }
}

impl_model!(Review);
