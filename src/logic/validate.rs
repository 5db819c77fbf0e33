use crate::logic::ServiceError;
use crate::model::{CreateCupcakeRequest, Cupcake, NewCupcake, UpdateCupcakeRequest};

// Measured in bytes of the trimmed name
const MIN_NAME_LEN: usize = 2;

/// Validates a create request and returns the trimmed cupcake to insert.
///
/// Checks run in a fixed order and the first failure wins:
/// name present, name length, flavor present, price.
pub fn validate_create(request: &CreateCupcakeRequest) -> Result<NewCupcake, ServiceError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServiceError::NameRequired);
    }
    if !has_min_name_length(name) {
        return Err(ServiceError::NameTooShort);
    }

    let flavor = request.flavor.trim();
    if flavor.is_empty() {
        return Err(ServiceError::FlavorRequired);
    }

    if request.price_cents <= 0 {
        return Err(ServiceError::InvalidPrice);
    }

    Ok(NewCupcake {
        name: name.to_string(),
        flavor: flavor.to_string(),
        price_cents: request.price_cents,
        is_available: true,
    })
}

/// Merges a partial update onto `existing` and returns the merged copy.
///
/// Fields are checked name, flavor, price, availability. On the first
/// failure nothing is returned, so a rejected update never leaks a
/// half-applied entity. Unlike create, an empty name reports
/// `NameTooShort` and flavor is not required to be non-empty.
pub fn apply_update(
    existing: &Cupcake,
    request: &UpdateCupcakeRequest,
) -> Result<Cupcake, ServiceError> {
    let mut merged = existing.clone();

    if let Some(name) = &request.name {
        let name = name.trim();
        if !has_min_name_length(name) {
            return Err(ServiceError::NameTooShort);
        }
        merged.name = name.to_string();
    }

    if let Some(flavor) = &request.flavor {
        merged.flavor = flavor.trim().to_string();
    }

    if let Some(price_cents) = request.price_cents {
        if price_cents <= 0 {
            return Err(ServiceError::InvalidPrice);
        }
        merged.price_cents = price_cents;
    }

    if let Some(is_available) = request.is_available {
        merged.is_available = is_available;
    }

    Ok(merged)
}

fn has_min_name_length(name: &str) -> bool {
    name.len() >= MIN_NAME_LEN
}
