//! API route handlers

pub mod examples;
pub mod generate;
pub mod health;
