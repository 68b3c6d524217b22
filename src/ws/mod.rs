//! WebSocket layer: connection handling and message routing.
//!
//! The WebSocket endpoint at `/ws` pushes every notifier event to the UI
//! and accepts a small set of read and mark-read commands.

pub mod connection;
pub mod handler;
pub mod messages;
