use serde::{Deserialize, Serialize};

use super::rating::RatingResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: i64,
    pub store_name: String,
    #[serde(flatten)]
    pub rating: RatingResult,
    pub appeal_point: Option<String>,
    pub url: Option<String>,
    pub image_path: Option<String>,
}

/// A restaurant that has not been stored yet. The name is never blank.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    store_name: String,
    pub rating: RatingResult,
    pub appeal_point: Option<String>,
    pub url: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("store name must not be empty")]
pub struct EmptyStoreName;

impl NewRestaurant {
    pub fn new(store_name: &str) -> Result<Self, EmptyStoreName> {
        let store_name = store_name.trim();
        if store_name.is_empty() {
            return Err(EmptyStoreName);
        }

        Ok(NewRestaurant {
            store_name: store_name.to_string(),
            rating: RatingResult::default(),
            appeal_point: None,
            url: None,
            image_path: None,
        })
    }

    /// Convenience for persisting the outcome of a review analysis.
    pub fn with_rating(store_name: &str, rating: RatingResult) -> Result<Self, EmptyStoreName> {
        let mut restaurant = NewRestaurant::new(store_name)?;
        restaurant.rating = rating;
        Ok(restaurant)
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }
}
