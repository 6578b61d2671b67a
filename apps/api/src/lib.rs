//! Classifieds API Library
//!
//! This library provides the core functionality for the classifieds
//! marketplace API: ads, categories and users with their locations.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
