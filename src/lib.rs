//! Core library exports for the PC configurator service.
//!
//! The crate models a PC build as one optional product per component slot,
//! checks the selected parts against each other, keeps any number of named
//! builds in a key-value store and serves all of it over a JSON API.

#[cfg(feature = "data")]
pub mod aggregates;
#[cfg(feature = "data")]
pub mod builder;
#[cfg(feature = "data")]
pub mod compatibility;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;
