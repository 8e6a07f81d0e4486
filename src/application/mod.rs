//! Client services: session, transport, editors, and the views built on them.

pub mod api;
pub mod auth;
pub mod editor;
pub mod error;
pub mod feed;
pub mod keyboard;
pub mod navigation;
pub mod posts;
pub mod profile;
pub mod public;
pub mod session;
pub mod shell;
