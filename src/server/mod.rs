//! Service surfaces.
//!
//! [`orchestrator`] drives requests end to end and is shared by the gRPC
//! and HTTP layers; [`grpc`] is the primary RPC surface; [`http`] serves
//! health, metrics, and the UI-facing JSON endpoints.

pub mod grpc;
pub mod http;
pub mod orchestrator;

pub use orchestrator::Orchestrator;
