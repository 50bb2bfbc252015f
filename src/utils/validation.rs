use chrono::{DateTime, Utc};

use crate::entities::train;

/// A rejected input, keyed by the request field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Error for a foreign key that points at nothing.
    pub fn missing_object(field: impl Into<String>, id: i32) -> Self {
        Self::new(
            field,
            format!("Invalid pk \"{}\" - object does not exist.", id),
        )
    }
}

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Largest value a small integer column can hold.
const SMALL_INT_MAX: i32 = i16::MAX as i32;

/// A route must connect two different stations.
pub fn validate_route(source: i32, destination: i32) -> Result<(), ValidationError> {
    if source == destination {
        return Err(ValidationError::new(
            "destination",
            "Source and destination stations must be different",
        ));
    }
    Ok(())
}

pub fn validate_route_distance(distance: i32) -> Result<i16, ValidationError> {
    if !(0..=SMALL_INT_MAX).contains(&distance) {
        return Err(ValidationError::new(
            "distance",
            format!("Ensure this value is between 0 and {}.", SMALL_INT_MAX),
        ));
    }
    i16::try_from(distance).map_err(|e| ValidationError::new("distance", e.to_string()))
}

/// Checks train dimensions and narrows them to their stored width.
pub fn validate_train(
    carriage_num: i32,
    places_in_carriage: i32,
) -> Result<(i16, i16), ValidationError> {
    let mut narrowed = [0i16; 2];
    for (slot, (value, field)) in narrowed.iter_mut().zip([
        (carriage_num, "carriage_num"),
        (places_in_carriage, "places_in_carriage"),
    ]) {
        if !(1..=SMALL_INT_MAX).contains(&value) {
            return Err(ValidationError::new(
                field,
                format!("Ensure this value is between 1 and {}.", SMALL_INT_MAX),
            ));
        }
        *slot = i16::try_from(value).map_err(|e| ValidationError::new(field, e.to_string()))?;
    }
    Ok((narrowed[0], narrowed[1]))
}

/// Rejects a carriage or seat number outside the train's layout.
///
/// Carriage is checked before seat, so a request wrong on both reports the
/// carriage.
pub fn validate_ticket(
    carriage: i32,
    seat: i32,
    train: &train::Model,
) -> Result<(), ValidationError> {
    for (value, field, limit_name, limit) in [
        (carriage, "carriage", "carriage_num", train.carriage_num),
        (seat, "seat", "places_in_carriage", train.places_in_carriage),
    ] {
        if !(1..=i32::from(limit)).contains(&value) {
            return Err(ValidationError::new(
                field,
                format!(
                    "{} number must be in available range: (1, {}): (1, {})",
                    field, limit_name, limit
                ),
            ));
        }
    }
    Ok(())
}

pub fn validate_journey_times(
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if arrival_time <= departure_time {
        return Err(ValidationError::new(
            "arrival_time",
            "Arrival time must be after departure time",
        ));
    }
    Ok(())
}
