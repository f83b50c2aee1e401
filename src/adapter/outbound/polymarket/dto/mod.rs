//! Polymarket data transfer objects.

pub mod response;
