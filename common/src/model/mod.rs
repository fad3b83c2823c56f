//! Domain models for the trading desk

pub mod market;
pub mod order;
