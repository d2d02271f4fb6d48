//! Core types, validation and the storage contract for Bookmark Locker.
//!
//! Everything in this crate is free of I/O. The server crate provides the
//! storage backends and the HTTP surface on top of these types.

pub mod bookmark;
pub mod storage;
