pub mod menu_item;
pub mod show;
pub mod seat;

pub use menu_item::{MenuItemRow, MenuNode};
pub use show::{Show, ShowRow};
pub use seat::{Seat, SeatRow};
