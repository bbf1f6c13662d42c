pub mod booking;
pub mod session;
pub mod user;
