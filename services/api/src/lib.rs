//! services/api/src/lib.rs
//!
//! The blog summary authentication backend: registration, login and a stateless
//! bearer-token guard over a pluggable user store.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod error;
pub mod token;
pub mod web;
