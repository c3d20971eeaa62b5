//! Cache-aside services over the repository ports.

pub mod articles;
pub mod comments;
pub mod counter;
pub mod error;
pub mod repos;
pub mod seed;
