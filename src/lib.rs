//! Library crate for pitchboard-back, exposing modules for the binary and integration tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod llm;
pub mod routes;
pub mod services;
pub mod state;
