//! Article and comment services with cache-aside secondary indexes.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
