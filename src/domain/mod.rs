//! Pure client state: collection rules, gallery and filter state, routing.

pub mod collections;
pub mod filter;
pub mod gallery;
pub mod routes;
