//! NutriLog Library
//!
//! Nutrition aggregation, a local meal journal, and a client for the
//! nutrition backend, exposed as MCP tools.

pub mod api;
pub mod build_info;
pub mod catalog;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
