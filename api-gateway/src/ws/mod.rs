//! WebSocket price streaming

pub mod handler;
