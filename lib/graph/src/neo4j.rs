//! Neo4j client over Bolt, built on `neo4rs`.
//!
//! Every [`Neo4jConnector::connect`] opens a new driver (connection pool) and a
//! write session on it. Each operation runs one statement inside an explicit
//! transaction.

use async_trait::async_trait;
use chrono::Local;
use introducer_core::{
    close_pair, Closeable, Connector, Error, Introducer, NodeId, Person, Result,
};
use neo4rs::{query, ConfigBuilder, Graph};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::GraphConfig;

// Neo4j 4+ rejects CREATE UNIQUE; MERGE keeps the "only if absent" intent.
const INTRODUCE_QUERY: &str = "
    MATCH (first:person), (second:person)
    WHERE first.person_id = $person_id AND second.person_id = $person_id2
    MERGE (first)-[r:FRIEND {since: $since}]->(second)
    RETURN first, second, r";

const KNOW_QUERY: &str = "
    CREATE (p:person)
    SET p.person_id = $person_id, p.name = $name, p.surname = $surname, p.email = $email
    RETURN p";

fn query_err(e: neo4rs::Error) -> Error {
    Error::Query(e.to_string())
}

/// Opens a fresh [`Communicator`] per call
pub struct Neo4jConnector {
    config: GraphConfig,
}

impl Neo4jConnector {
    pub fn new(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

#[async_trait]
impl Connector for Neo4jConnector {
    async fn connect(&self) -> Result<Box<dyn Introducer>> {
        let communicator = Communicator::connect(&self.config).await?;
        Ok(Box::new(communicator))
    }
}

/// Shared handle on the pool; `None` once closed.
struct Handle {
    name: &'static str,
    graph: Mutex<Option<Graph>>,
}

impl Handle {
    fn new(name: &'static str, graph: Graph) -> Self {
        Self {
            name,
            graph: Mutex::new(Some(graph)),
        }
    }

    fn graph(&self) -> Result<Graph> {
        self.graph.lock().clone().ok_or(Error::Closed)
    }
}

#[async_trait]
impl Closeable for Handle {
    async fn close(&self) -> Result<()> {
        let taken = self.graph.lock().take();
        match taken {
            Some(_) => {
                debug!("Closed neo4j {}", self.name);
                Ok(())
            }
            None => Err(Error::Closed),
        }
    }
}

/// Neo4j-backed [`Introducer`]
pub struct Communicator {
    driver: Handle,
    session: Handle,
}

impl Communicator {
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str());
        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }
        let neo_config = builder
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        debug!("Connected to {} as {}", config.uri, config.user);

        Ok(Self {
            driver: Handle::new("driver", graph.clone()),
            session: Handle::new("session", graph),
        })
    }
}

#[async_trait]
impl Introducer for Communicator {
    async fn introduce(&self, first: &Person, second: &Person) -> Result<()> {
        let graph = self.session.graph()?;
        let mut txn = graph.start_txn().await.map_err(query_err)?;

        let q = query(INTRODUCE_QUERY)
            .param("person_id", first.id().to_string())
            .param("person_id2", second.id().to_string())
            .param("since", Local::now().date_naive());

        if let Err(e) = txn.run(q).await {
            if let Err(rb) = txn.rollback().await {
                warn!("Rollback failed: {}", rb);
            }
            return Err(query_err(e));
        }

        txn.commit().await.map_err(query_err)
    }

    async fn know(&self, person: &Person) -> Result<NodeId> {
        let graph = self.session.graph()?;
        let mut txn = graph.start_txn().await.map_err(query_err)?;

        let q = query(KNOW_QUERY)
            .param("person_id", person.id().to_string())
            .param("name", person.firstname().to_string())
            .param("surname", person.surname().to_string())
            .param("email", person.email().to_string());

        let outcome: Result<NodeId> = async {
            let mut stream = txn.execute(q).await.map_err(query_err)?;
            let id = match stream.next(txn.handle()).await.map_err(query_err)? {
                Some(row) => {
                    let node: neo4rs::Node = row
                        .get("p")
                        .map_err(|e| Error::Decode(e.to_string()))?;
                    debug!("Created person node {}", node.id());
                    NodeId::new(node.id())
                }
                None => {
                    warn!("Create statement returned no record");
                    NodeId::default()
                }
            };
            // drain so the result summary is consumed before commit
            while stream.next(txn.handle()).await.map_err(query_err)?.is_some() {}
            Ok::<_, Error>(id)
        }
        .await;

        match outcome {
            Ok(id) => {
                txn.commit().await.map_err(query_err)?;
                Ok(id)
            }
            Err(e) => {
                if let Err(rb) = txn.rollback().await {
                    warn!("Rollback failed: {}", rb);
                }
                Err(e)
            }
        }
    }

    /// `neo4rs::Graph` has no fallible close, so the only error reported here is
    /// `Error::Closed` on a second close.
    async fn close(&self) -> Result<()> {
        close_pair(&self.driver, &self.session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_rejects_invalid_config() {
        let config = GraphConfig::new("http://localhost:7474", "neo4j", "test");
        assert!(matches!(
            Neo4jConnector::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_queries_use_person_label() {
        assert!(KNOW_QUERY.contains("CREATE (p:person)"));
        assert!(INTRODUCE_QUERY.contains("[r:FRIEND {since: $since}]"));
        assert!(!INTRODUCE_QUERY.contains("CREATE UNIQUE"));
    }
}
