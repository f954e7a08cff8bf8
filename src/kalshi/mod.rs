//! Kalshi module - Market data client for the Kalshi trade API

pub mod rest;

pub use rest::KalshiRestClient;
