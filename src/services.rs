// src/services.rs

pub mod access;
pub mod auth;
pub mod complaint_service;
pub mod hostel_service;
pub mod lifecycle;
pub mod moderation;
pub mod sso;
pub mod user_service;
