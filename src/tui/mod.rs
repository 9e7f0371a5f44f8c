//! Terminal interface
//!
//! Search bar, post cards and a status bar on top of a [`crate::PostFeed`].

pub mod app;
pub mod colors;
pub mod list;
pub mod search;
pub mod ui;

pub use app::App;
