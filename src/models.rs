pub mod auth;
pub mod complaint;
pub mod hostel;
pub mod user;
