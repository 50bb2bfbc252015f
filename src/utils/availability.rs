use crate::entities::train;

/// Seats still free on a journey run by `train` once `booked` tickets exist.
pub fn tickets_available(train: &train::Model, booked: i64) -> i64 {
    i64::from(train.capacity()) - booked
}
