//! Pure state-to-view mapping for every screen of the client.

pub mod views;
