//! Request handlers

pub mod health;
pub mod manuscripts;
pub mod notifications;
pub mod publication;
pub mod reviews;
