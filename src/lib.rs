//! Virtual Try-On Service
//!
//! Accepts a user photo and a clothing photo, asks fal.ai to render the
//! person wearing the garment, and keeps a record of every attempt in
//! PostgreSQL.

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
