//! # bid-notifier
//!
//! Client-side notification engine for an online auction marketplace.
//!
//! The engine polls the marketplace backend for the auctions a user bids on
//! and the auctions the user created, compares each result with the
//! previous one, and synthesizes notifications when an auction moves into
//! `outbid` or `done`. Server-side notification history is merged in as
//! well. The resulting list is persisted per session and served to the UI
//! over a small local REST and WebSocket surface.
//!
//! ## Architecture
//!
//! ```text
//! UI (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── NotificationService (service/)   polling loop, session generations
//!     ├── SnapshotFetcher (service/)       best-effort reads
//!     ├── EventBus (domain/)
//!     │
//!     ├── StateChangeDetector (domain/)    snapshot diffing
//!     ├── NotificationStore (domain/)      merge, read state
//!     │
//!     ├── AuctionBackend (backend/)        reqwest REST client
//!     └── RecordStorage (persistence/)     JSON file per session
//! ```

pub mod api;
pub mod app_state;
pub mod backend;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
