pub mod shows;

pub use shows::ShowService;
