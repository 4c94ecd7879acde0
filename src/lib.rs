//! Headless client for a cryptocurrency price and forecast dashboard.
//!
//! Talks to the dashboard REST backend, derives support/resistance levels
//! from recent candles and keeps the view state (selection, price polling,
//! search debouncing) that a renderer draws from.

pub mod config;
pub mod core;
pub mod display;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod notify;
pub mod services;
pub mod view;
