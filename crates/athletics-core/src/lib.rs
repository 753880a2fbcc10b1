//! Athletics Core - Shared library for the athletics data browser.
//!
//! This crate provides the API client, data models, authentication,
//! configuration, the cached fetch layer and the views built on it.
//! It is used by the `athletics` command-line front-end.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;
pub mod views;
