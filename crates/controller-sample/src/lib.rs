//! # Controller Sample App Library
//!
//! This library exposes the sample application's modules for integration testing.

pub mod config;
pub mod controllers;
pub mod error;
pub mod lifecycle;
