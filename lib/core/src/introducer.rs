//! Client traits shared by every graph backend.
//!
//! A [`Connector`] hands out a fresh [`Introducer`] per call; callers are
//! expected to [`Introducer::close`] it when done. Nothing is pooled.

use async_trait::async_trait;
use tracing::warn;

use crate::{NodeId, Person, Result};

/// Records people and the friendships between them.
#[async_trait]
pub trait Introducer: Send + Sync {
    /// Create a `FRIEND` relationship from `first` to `second`, matched on
    /// `person_id`. Unknown ids are not an error: nothing matches, nothing is created.
    async fn introduce(&self, first: &Person, second: &Person) -> Result<()>;

    /// Create a `person` node and return the id the database assigned to it.
    ///
    /// If the statement yields no record the result is `NodeId::default()`
    /// paired with the statement's own outcome, which may be `Ok`.
    async fn know(&self, person: &Person) -> Result<NodeId>;

    /// Release the driver and the session.
    async fn close(&self) -> Result<()>;
}

/// Builds a new client on every call.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Introducer>>;
}

/// A resource with an explicit async close.
#[async_trait]
pub trait Closeable: Send + Sync {
    async fn close(&self) -> Result<()>;
}

/// Close the driver, then the session.
///
/// Both are attempted. The first failure is returned; a later one is logged and dropped.
pub async fn close_pair(driver: &dyn Closeable, session: &dyn Closeable) -> Result<()> {
    let driver_result = driver.close().await;
    let session_result = session.close().await;

    match (driver_result, session_result) {
        (Err(e), Err(dropped)) => {
            warn!("Session close failed after driver close failed: {}", dropped);
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}
