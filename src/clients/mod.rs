//! Clients for the external backends: text models, the vector store, and
//! the cache. All are long-lived and safe to share across concurrent
//! requests; only the vector store opens a logical session per
//! retrieval-path RPC.

pub mod cache;
pub mod llm;
pub mod vector;

#[cfg(test)]
pub mod testing;
