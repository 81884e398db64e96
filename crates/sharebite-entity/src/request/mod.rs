//! Food request domain entities.

pub mod model;
pub mod status;

pub use model::{CreateFoodRequest, FoodRequest};
pub use status::RequestStatus;
