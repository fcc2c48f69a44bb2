//! In-process graph with the same contract as the Neo4j client.
//!
//! Used by `serve --in-memory` and by tests. All clients handed out by one
//! [`MemoryConnector`] share a single [`MemoryGraph`].

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use introducer_core::graph::SINCE_KEY;
use introducer_core::{
    close_pair, Closeable, Connector, Edge, Error, Introducer, Node, NodeId, Person, Result,
    FRIEND_RELATIONSHIP, PERSON_LABEL,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
struct Store {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_node_id: i64,
    next_edge_id: i64,
}

/// Shared node and edge store
#[derive(Clone, Default)]
pub struct MemoryGraph {
    store: Arc<RwLock<Store>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `person` node. Never deduplicates on `person_id`.
    pub fn create_person(&self, person: &Person) -> NodeId {
        let mut store = self.store.write();
        let id = NodeId::new(store.next_node_id);
        store.next_node_id += 1;
        store.nodes.push(Node::person(id, person));
        id
    }

    /// Link every `first` match to every `second` match, skipping pairs that
    /// already carry a `FRIEND` edge with the same `since`. Returns edges created.
    pub fn create_friendship(&self, first_id: &str, second_id: &str, since: NaiveDate) -> usize {
        let since = serde_json::Value::String(since.to_string());
        let mut store = self.store.write();

        let firsts = person_ids(&store.nodes, first_id);
        let seconds = person_ids(&store.nodes, second_id);

        let mut created = 0;
        for &from in &firsts {
            for &to in &seconds {
                let exists = store.edges.iter().any(|e| {
                    e.from == from
                        && e.to == to
                        && e.label == FRIEND_RELATIONSHIP
                        && e.properties.get(SINCE_KEY) == Some(&since)
                });
                if exists {
                    continue;
                }

                let edge_id = store.next_edge_id;
                store.next_edge_id += 1;
                store.edges.push(
                    Edge::new(edge_id, from, to, FRIEND_RELATIONSHIP)
                        .with_property(SINCE_KEY, since.clone()),
                );
                created += 1;
            }
        }
        created
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.store.read().nodes.clone()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.store.read().edges.clone()
    }

    pub fn find_by_person_id(&self, person_id: &str) -> Vec<Node> {
        self.store
            .read()
            .nodes
            .iter()
            .filter(|n| is_person(n, person_id))
            .cloned()
            .collect()
    }
}

fn is_person(node: &Node, person_id: &str) -> bool {
    node.label == PERSON_LABEL && node.person_id() == Some(person_id)
}

fn person_ids(nodes: &[Node], person_id: &str) -> Vec<NodeId> {
    nodes
        .iter()
        .filter(|n| is_person(n, person_id))
        .map(|n| n.id)
        .collect()
}

/// Hands out [`MemoryClient`]s over one shared graph
#[derive(Clone, Default)]
pub struct MemoryConnector {
    graph: MemoryGraph,
}

impl MemoryConnector {
    pub fn new(graph: MemoryGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &MemoryGraph {
        &self.graph
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> Result<Box<dyn Introducer>> {
        Ok(Box::new(MemoryClient::new(self.graph.clone())))
    }
}

struct Handle {
    graph: Mutex<Option<MemoryGraph>>,
}

impl Handle {
    fn new(graph: MemoryGraph) -> Self {
        Self {
            graph: Mutex::new(Some(graph)),
        }
    }

    fn graph(&self) -> Result<MemoryGraph> {
        self.graph.lock().clone().ok_or(Error::Closed)
    }
}

#[async_trait]
impl Closeable for Handle {
    async fn close(&self) -> Result<()> {
        let taken = self.graph.lock().take();
        taken.map(|_| ()).ok_or(Error::Closed)
    }
}

pub struct MemoryClient {
    driver: Handle,
    session: Handle,
}

impl MemoryClient {
    pub fn new(graph: MemoryGraph) -> Self {
        Self {
            driver: Handle::new(graph.clone()),
            session: Handle::new(graph),
        }
    }
}

#[async_trait]
impl Introducer for MemoryClient {
    async fn introduce(&self, first: &Person, second: &Person) -> Result<()> {
        let graph = self.session.graph()?;
        let created = graph.create_friendship(first.id(), second.id(), Local::now().date_naive());
        debug!("Introduced {} to {}: {} edge(s)", first.id(), second.id(), created);
        Ok(())
    }

    async fn know(&self, person: &Person) -> Result<NodeId> {
        let graph = self.session.graph()?;
        let id = graph.create_person(person);
        debug!("Created person node {}", id);
        Ok(id)
    }

    async fn close(&self) -> Result<()> {
        close_pair(&self.driver, &self.session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Person {
        Person::new("ann", "lee", "ann@example.com", "a-1")
    }

    fn bob() -> Person {
        Person::new("bob", "ray", "bob@example.com", "b-2")
    }

    #[tokio::test]
    async fn test_know_twice_creates_two_nodes() {
        let connector = MemoryConnector::default();
        let client = connector.connect().await.unwrap();

        let first = client.know(&ann()).await.unwrap();
        let second = client.know(&ann()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(connector.graph().find_by_person_id("a-1").len(), 2);
    }

    #[tokio::test]
    async fn test_ids_start_at_zero_and_increase() {
        let connector = MemoryConnector::default();
        let client = connector.connect().await.unwrap();

        assert_eq!(client.know(&ann()).await.unwrap(), NodeId::new(0));
        assert_eq!(client.know(&bob()).await.unwrap(), NodeId::new(1));
    }

    #[tokio::test]
    async fn test_clients_share_graph() {
        let connector = MemoryConnector::default();
        connector.connect().await.unwrap().know(&ann()).await.unwrap();
        connector.connect().await.unwrap().know(&bob()).await.unwrap();
        assert_eq!(connector.graph().nodes().len(), 2);
    }

    #[tokio::test]
    async fn test_introduce_creates_friend_edge() {
        let connector = MemoryConnector::default();
        let client = connector.connect().await.unwrap();
        let a = client.know(&ann()).await.unwrap();
        let b = client.know(&bob()).await.unwrap();

        client.introduce(&ann(), &bob()).await.unwrap();

        let edges = connector.graph().edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, a);
        assert_eq!(edges[0].to, b);
        assert_eq!(edges[0].label, FRIEND_RELATIONSHIP);
        assert!(edges[0].properties.contains_key(SINCE_KEY));
    }

    #[tokio::test]
    async fn test_introduce_same_day_is_idempotent() {
        let connector = MemoryConnector::default();
        let client = connector.connect().await.unwrap();
        client.know(&ann()).await.unwrap();
        client.know(&bob()).await.unwrap();

        client.introduce(&ann(), &bob()).await.unwrap();
        client.introduce(&ann(), &bob()).await.unwrap();

        assert_eq!(connector.graph().edges().len(), 1);
    }

    #[tokio::test]
    async fn test_introduce_unknown_person_is_noop() {
        let connector = MemoryConnector::default();
        let client = connector.connect().await.unwrap();
        client.know(&ann()).await.unwrap();

        assert!(client.introduce(&ann(), &bob()).await.is_ok());
        assert!(connector.graph().edges().is_empty());
    }

    #[test]
    fn test_friendship_links_every_match() {
        let graph = MemoryGraph::new();
        graph.create_person(&ann());
        graph.create_person(&ann());
        graph.create_person(&bob());

        let since = NaiveDate::from_ymd_opt(2019, 6, 1).unwrap();
        assert_eq!(graph.create_friendship("a-1", "b-2", since), 2);

        let later = NaiveDate::from_ymd_opt(2019, 6, 2).unwrap();
        assert_eq!(graph.create_friendship("a-1", "b-2", later), 2);
        assert_eq!(graph.edges().len(), 4);
    }

    #[tokio::test]
    async fn test_operations_after_close_fail() {
        let client = MemoryClient::new(MemoryGraph::new());
        client.close().await.unwrap();

        assert!(matches!(client.know(&ann()).await, Err(Error::Closed)));
        assert!(matches!(client.close().await, Err(Error::Closed)));
    }
}
