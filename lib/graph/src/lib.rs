//! Graph clients for introducer.
//!
//! - [`Neo4jConnector`] / [`Communicator`] talk to Neo4j over Bolt
//! - [`MemoryConnector`] / [`MemoryClient`] keep the graph in process

pub mod config;
pub mod memory;
pub mod neo4j;

pub use config::GraphConfig;
pub use memory::{MemoryClient, MemoryConnector, MemoryGraph};
pub use neo4j::{Communicator, Neo4jConnector};
