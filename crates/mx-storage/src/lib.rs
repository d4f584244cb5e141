//! mx-storage - Storage library for mockexam
//!
//! This crate reads the question bank and persists bookmarks on disk.

mod bank;
mod bookmark_store;

pub use bank::load_bank;
pub use bookmark_store::{default_data_dir, FileBookmarkStore, BOOKMARK_FILE};
