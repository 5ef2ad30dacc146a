//! Route animation engine.
//!
//! Plans a travel-route animation: given an ordered list of cities and a
//! target duration, decides how long each leg takes, when labels appear,
//! and where the camera is at any instant.
//!
//! The engine itself (`geodesy`, `timeline`, `session`) is pure and
//! synchronous. Place lookup and the HTTP surface sit around it.

pub mod document;
pub mod domain;
pub mod geocode;
pub mod geodesy;
pub mod session;
pub mod timeline;
pub mod web;
