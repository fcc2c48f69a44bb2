use introducer_core::{Error, Result};

pub const DEFAULT_URI: &str = "bolt://0.0.0.0:7687";
pub const DEFAULT_USER: &str = "neo4j";
pub const DEFAULT_PASSWORD: &str = "test";

const SCHEMES: &[&str] = &["bolt", "bolt+s", "bolt+ssc", "neo4j", "neo4j+s", "neo4j+ssc"];

/// Connection settings for the Neo4j client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Target database; the server default when `None`.
    pub database: Option<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            database: None,
        }
    }
}

impl GraphConfig {
    pub fn new(uri: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            database: None,
        }
    }

    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(Error::InvalidConfig("connection URI is empty".to_string()));
        }

        let scheme = match self.uri.split_once("://") {
            Some((scheme, rest)) if !rest.is_empty() => scheme,
            _ => {
                return Err(Error::InvalidConfig(format!(
                    "connection URI has no scheme or host: {}",
                    self.uri
                )))
            }
        };

        if !SCHEMES.contains(&scheme) {
            return Err(Error::InvalidConfig(format!(
                "unsupported URI scheme: {}",
                scheme
            )));
        }

        if matches!(self.database.as_deref(), Some("")) {
            return Err(Error::InvalidConfig("database name is empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GraphConfig::default();
        assert_eq!(config.uri, "bolt://0.0.0.0:7687");
        assert_eq!(config.user, "neo4j");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_uris() {
        for uri in ["", "localhost:7687", "http://localhost:7687", "bolt://"] {
            let config = GraphConfig::new(uri, "neo4j", "test");
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "accepted {:?}",
                uri
            );
        }
    }

    #[test]
    fn test_accepts_routing_and_tls_schemes() {
        for uri in ["neo4j://db:7687", "bolt+s://db:7687", "neo4j+ssc://db"] {
            assert!(GraphConfig::new(uri, "u", "p").validate().is_ok());
        }
    }

    #[test]
    fn test_rejects_empty_database() {
        let config = GraphConfig::default().with_database("");
        assert!(config.validate().is_err());
        assert!(GraphConfig::default().with_database("people").validate().is_ok());
    }
}
