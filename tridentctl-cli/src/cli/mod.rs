//! CLI command handling

pub mod handlers;
pub mod render;
pub mod rest;
