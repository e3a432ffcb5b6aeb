//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate fetch, ingest, build and render into one load cycle.
//! - Keep CLI layers decoupled from ingest and layout details.

pub mod lineage_service;
