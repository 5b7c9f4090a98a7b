//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The argument model and its validation rules
//! - Synthesis of the OpenWeatherMap request URL
//! - Status classification of the response and rendering of its fields as text
//! - Optional configuration (a default API key)
//!
//! It is used by `weather-cli`, but the pieces are plain functions over plain data
//! and can be driven by any flag parser or HTTP client.

pub mod args;
pub mod config;
pub mod fetch;
pub mod format;
pub mod request;

pub use args::{Arg, ArgValue, ArgumentError, ArgumentModel, TemperatureUnit};
pub use config::Config;
pub use fetch::{FetchOutcome, HttpFetcher, WeatherFetcher, classify_status};
pub use format::{FormatError, format_weather};
pub use request::{RequestResult, synthesize};
