//! # introducer
//!
//! A small HTTP service that records people and friendships in a Neo4j graph.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! introducer --bolt-uri bolt://localhost:7687 --user neo4j --password test serve --http-port 8068
//! curl --header "Content-Type: application/json" --request POST \
//!   --data '{"Name":"maxim","Email":"zhiburt@gmail.com","Surname":"zhibur","id":"123kj23l"}' \
//!   http://localhost:8068/add
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use introducer::prelude::*;
//!
//! # async fn run() -> introducer::Result<()> {
//! let connector = MemoryConnector::default();
//! let client = connector.connect().await?;
//!
//! let ann = Person::new("ann", "lee", "ann@example.com", "a-1");
//! let bob = Person::new("bob", "ray", "bob@example.com", "b-2");
//! let id = client.know(&ann).await?;
//! client.know(&bob).await?;
//! client.introduce(&ann, &bob).await?;
//! client.close().await?;
//! # let _ = id;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - `introducer-core` - Person, node ids, errors, client traits
//! - `introducer-graph` - Neo4j and in-memory clients
//! - `introducer-api` - REST API

// Re-export core types
pub use introducer_core::{
    close_pair, Closeable, Connector, Edge, Error, Introducer, Node, NodeId, Person, Result,
};

// Re-export graph clients
pub use introducer_graph::{
    Communicator, GraphConfig, MemoryClient, MemoryConnector, MemoryGraph, Neo4jConnector,
};

// Re-export API
pub use introducer_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Connector, Error, GraphConfig, Introducer, MemoryConnector, Neo4jConnector, NodeId,
        Person, RestApi, Result,
    };
}
