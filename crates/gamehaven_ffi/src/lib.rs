//! Flutter bridge for the GameHaven core.

pub mod api;
