// src/handlers.rs

pub mod admin;
pub mod auth;
pub mod mentor;
pub mod student;
pub mod warden;
