//! Hivekeep: local-first beekeeping records with last-write-wins cloud sync.
//!
//! The local SQLite copy is authoritative while offline. [`sync::reconcile`]
//! compares it with the remote document store and the newer copy wins.

pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod remote;
pub mod repository;
pub mod server;
pub mod sync;
