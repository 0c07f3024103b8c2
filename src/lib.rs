//! FixNet repair-request intake.
//!
//! Localized display strings with English fallback, the three-step request
//! wizard, the intake API with its REST client, staff notifications, the
//! ticket board and the FixBot assistant.

pub mod api;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod i18n;
pub mod models;
pub mod security;
pub mod server;
pub mod storage;
pub mod telegram;
pub mod wizard;
