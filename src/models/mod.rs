pub mod account;
pub mod flight;
pub mod reservation;

pub use account::*;
pub use flight::*;
pub use reservation::*;
