use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub rating: Option<f64>,
    pub photo: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHotel {
    #[validate(length(min = 1, message = "Please add a hotel name"))]
    pub name: String,
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: String,
    #[validate(length(min = 1, message = "Please add an address"))]
    pub address: String,
    #[validate(length(min = 1, message = "Please add a city"))]
    pub city: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<f64>,
    pub photo: Option<String>,
}

impl CreateHotel {
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateHotel {
    #[validate(length(min = 1, message = "Please add a hotel name"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Please add an address"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "Please add a city"))]
    pub city: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<f64>,
    pub photo: Option<String>,
}

impl UpdateHotel {
    pub fn apply(self, mut hotel: Hotel) -> Hotel {
        if let Some(name) = self.name {
            hotel.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            hotel.description = description;
        }
        if let Some(address) = self.address {
            hotel.address = address;
        }
        if let Some(city) = self.city {
            hotel.city = city;
        }
        if self.rating.is_some() {
            hotel.rating = self.rating;
        }
        if let Some(photo) = self.photo {
            hotel.photo = photo;
        }
        hotel
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HotelSearch {
    pub search: Option<String>,
}
