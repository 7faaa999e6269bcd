//! # Arcana Scheduling Engine
//!
//! Reading scheduling and slot allocation engine for a psychic reader
//! marketplace.
//!
//! This crate turns weekly availability templates into concrete bookable
//! time slots, books readings against them without double-booking a
//! reader, and walks each booking through its lifecycle. It also expands
//! recurring bookings into series and dispatches instant reading requests
//! with a short acceptance deadline. The engine exposes a REST API via
//! Axum when the `http-server` feature is enabled.
//!
//! ## Features
//!
//! - **Availability**: Weekly recurring templates per reader, per reading type
//! - **Slot Generation**: Derive open slots from templates minus active bookings
//! - **Booking Lifecycle**: Pending, confirmed, in-progress, completed, and the exits
//! - **Recurrence**: Weekly, biweekly, and monthly series expansion
//! - **Pricing**: Per-minute rates, fixed-price packages, discount calculation
//! - **Instant Requests**: Time-limited reading requests with lazy expiry
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Domain types shared across layers
//! - [`models`]: Id newtypes, money, and time primitives
//! - [`db`]: Repository traits, in-memory backend, factory, and configuration
//! - [`services`]: Business logic over the repository traits
//! - [`external`]: Auth token and payment gateway seams
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod external;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
