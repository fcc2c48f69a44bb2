//! # introducer core
//!
//! Types shared by the graph clients and the REST API:
//!
//! - [`Person`] - the value recorded as a `person` node
//! - [`NodeId`], [`Node`], [`Edge`] - graph-side shapes
//! - [`Introducer`], [`Connector`] - the client traits every backend implements
//! - [`Error`] - the one error type all of them return

pub mod error;
pub mod graph;
pub mod introducer;
pub mod person;

pub use error::{Error, Result};
pub use graph::{Edge, Node, NodeId, FRIEND_RELATIONSHIP, PERSON_LABEL};
pub use introducer::{close_pair, Closeable, Connector, Introducer};
pub use person::Person;
