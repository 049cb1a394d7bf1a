//! Credit Report Ingest Library
//!
//! This library turns bureau XML credit reports into fixed-shape credit
//! report aggregates and serves them over HTTP, including the normalization
//! engine, XML decoding, persistence, and HTTP handlers.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic (the normalization engine).
//! - `data`: Data access layer.
//! - `integrations`: External format integrations.
//! - `obs`: Observability and logging.
//! - `address`: Holder address assembly.
//! - `coercion`: Numeric coercion of textual leaves.
//! - `config`: Configuration management.
//! - `db`: Database connection and schema.
//! - `db_storage`: Database storage operations.
//! - `errors`: Error handling types.
//! - `extractor`: Credit report aggregate builder.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `normalizer`: Singular-vs-repeated element normalization.
//! - `routes`: HTTP route tables.
//! - `tree`: Default-producing document tree navigation.
//! - `xml_tree`: Generic XML-to-tree decoding.

pub mod api;
pub mod core;
pub mod data;
pub mod integrations;
pub mod obs;

// Re-export primary modules for shared use in tests and other binaries
pub mod address;
pub mod coercion;
pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod routes;
pub mod tree;
pub mod xml_tree;
