pub mod category;
pub mod fact;
pub mod seat;
pub mod seat_map;

pub use category::Category;
pub use fact::Fact;
pub use seat::{Seat, SeatStatus};
pub use seat_map::SeatMap;
