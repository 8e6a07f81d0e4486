#![deny(clippy::all, clippy::pedantic)]

pub mod auth;
pub mod gallery;
pub mod posts;
pub mod profile;
