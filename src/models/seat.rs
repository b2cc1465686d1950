use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SeatRow {
    pub id: i64,
    pub showroom_id: i64,
    pub row: String,
    pub number: i32,
    pub seat_type: String,
    pub premium_percentage: i32,
    pub base_price_cents: Option<i64>,
    pub booked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: i64,
    pub showroom_id: i64,
    pub row: String,
    pub number: i32,
    pub seat_type: String,
    pub premium_percentage: i32,
    /// Цена с учетом надбавки типа места, в копейках/центах.
    pub effective_price_cents: Option<i64>,
    /// То же самое строкой, `"15.00"`.
    pub effective_price: Option<String>,
    pub available: bool,
}
