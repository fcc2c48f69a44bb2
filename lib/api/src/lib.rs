//! REST API for introducer.
//!
//! One route, `POST /add`, which records a person as a graph node and returns
//! the node id.

pub mod rest;

pub use rest::{configure, RestApi};
