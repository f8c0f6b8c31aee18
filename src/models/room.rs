use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum RoomType {
    Single,
    Double,
    Suite,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    #[serde(rename = "hotel")]
    pub hotel_id: i64,
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub price: f64,
    pub is_available: bool,
}

/// A room with its hotel reference expanded for the room page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetails {
    pub id: i64,
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub price: f64,
    pub is_available: bool,
    pub hotel: HotelSummary,
}

impl RoomDetails {
    pub fn new(room: Room, hotel: HotelSummary) -> Self {
        Self {
            id: room.id,
            room_number: room.room_number,
            room_type: room.room_type,
            price: room.price,
            is_available: room.is_available,
            hotel,
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct HotelSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    #[validate(length(min = 1, message = "Please add a room number"))]
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: f64,
    pub is_available: Option<bool>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoom {
    #[validate(length(min = 1, message = "Please add a room number"))]
    pub room_number: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<RoomType>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: Option<f64>,
    pub is_available: Option<bool>,
}

impl UpdateRoom {
    pub fn apply(self, mut room: Room) -> Room {
        if let Some(room_number) = self.room_number {
            room.room_number = room_number;
        }
        if let Some(room_type) = self.room_type {
            room.room_type = room_type;
        }
        if let Some(price) = self.price {
            room.price = price;
        }
        if let Some(is_available) = self.is_available {
            room.is_available = is_available;
        }
        room
    }
}
