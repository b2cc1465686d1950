use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ShowRow {
    pub id: i64,
    pub movie_id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub showroom_id: i64,
    pub showroom_name: String,
    pub price_cents: Option<i64>,
    pub capacity: i64,
    pub booked: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: i64,
    pub movie_id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub showroom_id: i64,
    pub showroom_name: String,
    pub price_cents: Option<i64>,
    pub price: Option<String>,
    pub capacity: i64,
    pub booked: i64,
    pub free_seats: i64,
    pub sold_out: bool,
}
