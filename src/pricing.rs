//! Цена места и доступность сеанса.
//!
//! Деньги храним в минимальных единицах (центы), чтобы не тащить f64 в расчеты.

/// Базовая цена сеанса с надбавкой типа места: `base * (1 + premium / 100)`.
/// Округление половины - от нуля.
pub fn effective_price_cents(base_cents: i64, premium_percentage: i32) -> i64 {
    let scaled = i128::from(base_cents) * (100 + i128::from(premium_percentage));
    let rounded = if scaled >= 0 {
        (scaled + 50) / 100
    } else {
        (scaled - 50) / 100
    };
    rounded as i64
}

/// Сеанс распродан, когда занято не меньше мест, чем есть в зале.
pub fn is_sold_out(booked: i64, capacity: i64) -> bool {
    booked >= capacity
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
