//! Sleuthdex - Detective Marketplace Core
//!
//! This crate implements the backend core of a private-investigator
//! marketplace: the ranked public directory, subscription plans with
//! entitlements, and the scheduled passes that keep both honest.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
