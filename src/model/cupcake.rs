use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned identifier of a cupcake
pub type CupcakeId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cupcake {
    pub id: CupcakeId,
    pub name: String,
    pub flavor: String,
    pub price_cents: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>, // set by the store on insert
    pub updated_at: DateTime<Utc>, // refreshed by the store on every write
}

/// Validated cupcake ready to be inserted.
/// The ID and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCupcake {
    pub name: String,
    pub flavor: String,
    pub price_cents: i32,
    pub is_available: bool,
}

/// Request body for creating a cupcake.
///
/// Missing and `null` fields decode to their empty value so that
/// validation, not the JSON decoder, reports which field is wrong.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateCupcakeRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flavor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_cents: i32,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body for a partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCupcakeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}
