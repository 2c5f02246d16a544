pub mod clock;
pub mod user;
