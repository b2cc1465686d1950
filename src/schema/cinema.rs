//! Схема одного кинотеатра.
//!
//! - фильмы и сеансы: сеанс - один показ одного фильма в заданное время;
//! - залы и места: места принадлежат залу, а не сеансу, рассадку настраивают один раз;
//! - showroom_shows ставит сеанс в конкретный зал, разные залы могут показывать одновременно;
//! - pricing - цена на уровне сеанса, seat_types - процентная надбавка типа места;
//! - bookings - одно место на один сеанс, повторная бронь запрещена уникальным ключом.
//!
//! `shows.sold_out` - кеш, пересчитывается `ShowService::refresh_sold_out`.

use super::{Migration, TableDef};

pub static CINEMA_SYSTEM: Migration = Migration {
    name: "cinema_system",
    tables: &[
        TableDef {
            name: "movies",
            references: &[],
            create_sql: r#"
CREATE TABLE movies (
    id SERIAL PRIMARY KEY,
    title VARCHAR(255) NOT NULL
)"#,
            extra_sql: &[],
        },
        TableDef {
            name: "showrooms",
            references: &[],
            create_sql: r#"
CREATE TABLE showrooms (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL
)"#,
            extra_sql: &[],
        },
        TableDef {
            name: "seat_types",
            references: &[],
            create_sql: r#"
CREATE TABLE seat_types (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    premium_percentage INTEGER NOT NULL DEFAULT 0
)"#,
            extra_sql: &[],
        },
        TableDef {
            name: "shows",
            references: &["movies"],
            create_sql: r#"
CREATE TABLE shows (
    id SERIAL PRIMARY KEY,
    movie_id INTEGER NOT NULL REFERENCES movies(id),
    start_time TIMESTAMPTZ NOT NULL,
    sold_out BOOLEAN NOT NULL DEFAULT FALSE
)"#,
            extra_sql: &["CREATE INDEX idx_shows_start_time ON shows (start_time)"],
        },
        TableDef {
            name: "seats",
            references: &["showrooms", "seat_types"],
            create_sql: r#"
CREATE TABLE seats (
    id SERIAL PRIMARY KEY,
    showroom_id INTEGER NOT NULL REFERENCES showrooms(id),
    seat_type_id INTEGER NOT NULL REFERENCES seat_types(id),
    row VARCHAR(16) NOT NULL,
    number INTEGER NOT NULL,
    UNIQUE (showroom_id, row, number)
)"#,
            extra_sql: &[],
        },
        TableDef {
            name: "showroom_shows",
            references: &["showrooms", "shows"],
            create_sql: r#"
CREATE TABLE showroom_shows (
    id SERIAL PRIMARY KEY,
    showroom_id INTEGER NOT NULL REFERENCES showrooms(id),
    show_id INTEGER NOT NULL REFERENCES shows(id),
    UNIQUE (showroom_id, show_id)
)"#,
            extra_sql: &["CREATE INDEX idx_showroom_shows_show_id ON showroom_shows (show_id)"],
        },
        TableDef {
            name: "pricing",
            references: &["shows"],
            create_sql: r#"
CREATE TABLE pricing (
    id SERIAL PRIMARY KEY,
    show_id INTEGER NOT NULL REFERENCES shows(id),
    price NUMERIC(10, 2) NOT NULL CHECK (price >= 0)
)"#,
            extra_sql: &["CREATE INDEX idx_pricing_show_id ON pricing (show_id)"],
        },
        TableDef {
            name: "bookings",
            references: &["seats", "shows"],
            create_sql: r#"
CREATE TABLE bookings (
    id SERIAL PRIMARY KEY,
    seat_id INTEGER NOT NULL REFERENCES seats(id),
    show_id INTEGER NOT NULL REFERENCES shows(id),
    UNIQUE (seat_id, show_id)
)"#,
            extra_sql: &["CREATE INDEX idx_bookings_show_id ON bookings (show_id)"],
        },
    ],
};
