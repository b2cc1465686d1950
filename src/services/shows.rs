//! shows.rs
//!
//! Чтение расписания и зала поверх схемы кинотеатра.
//!
//! Флаг `shows.sold_out` считается кешем: источник правды - бронирования и
//! число мест в зале. Списки считают его заново, `refresh_sold_out`
//! пересчитывает сохраненную копию одним UPDATE.

use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::models::{Seat, SeatRow, Show, ShowRow};
use crate::pricing::{effective_price_cents, format_cents, is_sold_out};
use crate::store::{Param, Store};

// Заполненность пары (сеанс, зал): брони на места этого зала против числа его мест.
// Общая для списка сеансов и пересчета флага.
macro_rules! occupancy_cte {
    () => {
        r#"
WITH occupancy AS (
    SELECT ss.show_id, ss.showroom_id,
           (SELECT COUNT(*) FROM seats st WHERE st.showroom_id = ss.showroom_id) AS capacity,
           (SELECT COUNT(*) FROM bookings b JOIN seats st ON st.id = b.seat_id
             WHERE b.show_id = ss.show_id AND st.showroom_id = ss.showroom_id) AS booked
    FROM showroom_shows ss
)
"#
    };
}

// Если цен у сеанса несколько, берется последняя по id
pub const LIST_SHOWS_SQL: &str = concat!(
    occupancy_cte!(),
    r#"SELECT s.id, s.movie_id, m.title, s.start_time,
       sr.id AS showroom_id, sr.name AS showroom_name,
       (SELECT (p.price * 100)::BIGINT FROM pricing p
         WHERE p.show_id = s.id ORDER BY p.id DESC LIMIT 1) AS price_cents,
       o.capacity, o.booked
FROM shows s
JOIN movies m ON m.id = s.movie_id
JOIN occupancy o ON o.show_id = s.id
JOIN showrooms sr ON sr.id = o.showroom_id
ORDER BY s.start_time, s.id, sr.id
"#
);

pub const SHOW_SEATS_SQL: &str = r#"
SELECT st.id, st.showroom_id, st.row, st.number,
       t.name AS seat_type, t.premium_percentage,
       (SELECT (p.price * 100)::BIGINT FROM pricing p
         WHERE p.show_id = ss.show_id ORDER BY p.id DESC LIMIT 1) AS base_price_cents,
       EXISTS(SELECT 1 FROM bookings b
               WHERE b.seat_id = st.id AND b.show_id = ss.show_id) AS booked
FROM showroom_shows ss
JOIN seats st ON st.showroom_id = ss.showroom_id
JOIN seat_types t ON t.id = st.seat_type_id
WHERE ss.show_id = $1
ORDER BY st.showroom_id, st.row, st.number
"#;

// $1 = NULL пересчитывает все сеансы. Сеанс распродан, когда распроданы все его залы
pub const REFRESH_SOLD_OUT_SQL: &str = concat!(
    occupancy_cte!(),
    r#"UPDATE shows s
SET sold_out = COALESCE((
    SELECT bool_and(o.booked >= o.capacity) FROM occupancy o WHERE o.show_id = s.id
), FALSE)
WHERE $1::BIGINT IS NULL OR s.id = $1
"#
);

#[derive(Clone)]
pub struct ShowService {
    store: Arc<dyn Store>,
}

impl ShowService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Все сеансы с залом, ценой и заполненностью.
    /// `only_available` убирает распроданные.
    pub async fn list_shows(&self, only_available: bool) -> Result<Vec<Show>> {
        let rows = self.store.query(LIST_SHOWS_SQL, &[]).await?;

        let mut shows = Vec::with_capacity(rows.len());
        for row in &rows {
            let show = to_show(row.decode::<ShowRow>()?);
            if only_available && show.sold_out {
                continue;
            }
            shows.push(show);
        }
        shows.sort_by_key(|s| (s.start_time, s.id, s.showroom_id));
        Ok(shows)
    }

    /// Места зала для сеанса с итоговой ценой. Неизвестный сеанс - пустой список.
    pub async fn seats_for_show(&self, show_id: i64) -> Result<Vec<Seat>> {
        let rows = self
            .store
            .query(SHOW_SEATS_SQL, &[Param::Int(show_id)])
            .await?;

        let mut seats = rows
            .iter()
            .map(|row| -> Result<Seat> { Ok(to_seat(row.decode::<SeatRow>()?)) })
            .collect::<Result<Vec<_>>>()?;
        seats.sort_by(|a, b| {
            (a.showroom_id, &a.row, a.number).cmp(&(b.showroom_id, &b.row, b.number))
        });
        Ok(seats)
    }

    /// Пересчитывает сохраненный флаг `sold_out`. Возвращает число обновленных сеансов.
    pub async fn refresh_sold_out(&self, show_id: Option<i64>) -> Result<u64> {
        let param = show_id.map(Param::Int).unwrap_or(Param::Null);
        let updated = self.store.execute(REFRESH_SOLD_OUT_SQL, &[param]).await?;
        info!("Refreshed sold_out flag for {} shows", updated);
        Ok(updated)
    }
}

fn to_show(row: ShowRow) -> Show {
    Show {
        id: row.id,
        movie_id: row.movie_id,
        title: row.title,
        start_time: row.start_time,
        showroom_id: row.showroom_id,
        showroom_name: row.showroom_name,
        price: row.price_cents.map(format_cents),
        price_cents: row.price_cents,
        capacity: row.capacity,
        booked: row.booked,
        free_seats: (row.capacity - row.booked).max(0),
        sold_out: is_sold_out(row.booked, row.capacity),
    }
}

fn to_seat(row: SeatRow) -> Seat {
    let effective = row
        .base_price_cents
        .map(|base| effective_price_cents(base, row.premium_percentage));
    Seat {
        id: row.id,
        showroom_id: row.showroom_id,
        row: row.row,
        number: row.number,
        seat_type: row.seat_type,
        premium_percentage: row.premium_percentage,
        effective_price_cents: effective,
        effective_price: effective.map(format_cents),
        available: !row.booked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::testing::ScriptedStore;
    use crate::store::StoreError;
    use serde_json::json;

    fn show_row(id: i64, capacity: i64, booked: i64) -> serde_json::Value {
        room_row(id, 1, capacity, booked)
    }

    fn room_row(id: i64, showroom_id: i64, capacity: i64, booked: i64) -> serde_json::Value {
        json!({
            "id": id,
            "movie_id": 1,
            "title": "Metropolis",
            "start_time": "2024-05-01T20:00:00+00:00",
            "showroom_id": showroom_id,
            "showroom_name": format!("Hall {showroom_id}"),
            "price_cents": 1000,
            "capacity": capacity,
            "booked": booked,
        })
    }

    #[tokio::test]
    async fn derives_sold_out_from_bookings() {
        let store = Arc::new(ScriptedStore::with_rows(vec![
            show_row(1, 100, 100),
            show_row(2, 100, 40),
        ]));
        let service = ShowService::new(store);

        let shows = service.list_shows(false).await.unwrap();

        assert!(shows[0].sold_out);
        assert_eq!(shows[0].free_seats, 0);
        assert!(!shows[1].sold_out);
        assert_eq!(shows[1].free_seats, 60);
        assert_eq!(shows[1].price.as_deref(), Some("10.00"));
    }

    #[tokio::test]
    async fn available_filter_hides_sold_out_shows() {
        let store = Arc::new(ScriptedStore::with_rows(vec![
            show_row(1, 100, 100),
            show_row(2, 100, 40),
        ]));
        let service = ShowService::new(store.clone());

        let shows = service.list_shows(true).await.unwrap();

        assert_eq!(shows.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn seats_carry_effective_price() {
        let store = Arc::new(ScriptedStore::with_rows(vec![
            json!({
                "id": 11, "showroom_id": 1, "row": "A", "number": 1,
                "seat_type": "standard", "premium_percentage": 0,
                "base_price_cents": 1000, "booked": true,
            }),
            json!({
                "id": 12, "showroom_id": 1, "row": "A", "number": 2,
                "seat_type": "vip", "premium_percentage": 50,
                "base_price_cents": 1000, "booked": false,
            }),
            json!({
                "id": 13, "showroom_id": 1, "row": "B", "number": 1,
                "seat_type": "vip", "premium_percentage": 50,
                "base_price_cents": null, "booked": false,
            }),
        ]));
        let service = ShowService::new(store.clone());

        let seats = service.seats_for_show(7).await.unwrap();

        assert!(!seats[0].available);
        assert_eq!(seats[1].effective_price_cents, Some(1500));
        assert_eq!(seats[1].effective_price.as_deref(), Some("15.00"));
        assert!(seats[1].available);
        assert_eq!(seats[2].effective_price_cents, None);
        assert_eq!(store.calls.lock().unwrap()[0].1, vec![Param::Int(7)]);
    }

    #[tokio::test]
    async fn refresh_binds_null_for_all_shows() {
        let store = Arc::new(ScriptedStore::default());
        let service = ShowService::new(store.clone());

        service.refresh_sold_out(None).await.unwrap();
        service.refresh_sold_out(Some(3)).await.unwrap();

        let calls = store.calls.lock().unwrap();
        assert_eq!(calls[0].1, vec![Param::Null]);
        assert_eq!(calls[1].1, vec![Param::Int(3)]);
    }

    #[tokio::test]
    async fn show_in_two_rooms_is_counted_per_room() {
        // зал 1 заполнен, во втором свободно
        let store = Arc::new(ScriptedStore::with_rows(vec![
            room_row(1, 2, 2, 0),
            room_row(1, 1, 2, 2),
        ]));
        let service = ShowService::new(store);

        let shows = service.list_shows(false).await.unwrap();

        assert_eq!(
            shows.iter().map(|s| (s.showroom_id, s.sold_out)).collect::<Vec<_>>(),
            vec![(1, true), (2, false)]
        );
    }

    #[test]
    fn cached_flag_uses_the_listing_occupancy() {
        let occupancy = occupancy_cte!();
        assert!(LIST_SHOWS_SQL.starts_with(occupancy));
        assert!(REFRESH_SOLD_OUT_SQL.starts_with(occupancy));
        assert!(occupancy.contains("st.showroom_id = ss.showroom_id) AS booked"));
        assert!(REFRESH_SOLD_OUT_SQL.contains("bool_and(o.booked >= o.capacity)"));
    }

    #[tokio::test]
    async fn seats_are_sorted_by_room_row_and_number() {
        let seat = |id: i64, row: &str, number: i32| {
            json!({
                "id": id, "showroom_id": 1, "row": row, "number": number,
                "seat_type": "standard", "premium_percentage": 0,
                "base_price_cents": 1000, "booked": false,
            })
        };
        let store = Arc::new(ScriptedStore::with_rows(vec![
            seat(3, "B", 1),
            seat(2, "A", 2),
            seat(1, "A", 1),
        ]));
        let service = ShowService::new(store);

        let seats = service.seats_for_show(1).await.unwrap();

        assert_eq!(seats.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn query_errors_propagate() {
        let store = Arc::new(ScriptedStore::default());
        store.push_error(StoreError::database(None, "connection refused"));
        let service = ShowService::new(store);

        let err = service.list_shows(false).await.unwrap_err();

        assert!(matches!(err, Error::QueryFailed(_)));
    }
}
