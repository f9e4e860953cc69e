//! # datasmith
//!
//! Coherent synthetic retail data at the speed of Rust.
//!
//! A synthetic-data generation service for retail test automation. Clients
//! ask for N records of an entity (cart, order, payment, user, review, ...)
//! over gRPC or HTTP; the service routes each request to one of four
//! generation backends and returns coherent JSON records, unary or as a
//! stream of batches.
//!
//! ## Architecture
//!
//! - **Router-first**: every request is routed to synthetic, LLM,
//!   retrieval, or hybrid generation based on its shape
//! - **Per-instance RNG**: the synthetic path is seedable and deterministic
//! - **Fallback ladder**: retrieval degrades to synthetic, hybrid degrades
//!   to LLM; failures never escape the RPC boundary as panics

#![deny(missing_docs)]

pub mod clients;
pub mod config;
pub mod error;
pub mod generate;
pub mod prompt;
pub mod providers;
pub mod request;
pub mod rng;
pub mod router;
pub mod schema;
pub mod seed;
pub mod server;
pub mod telemetry;
pub mod validate;

/// Generated protobuf types for the RPC surface.
#[allow(missing_docs)]
pub mod pb {
    tonic::include_proto!("datasmith.v1");

    /// Compiled descriptor set for gRPC reflection.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("datasmith_descriptor");
}
