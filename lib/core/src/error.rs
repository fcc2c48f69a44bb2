use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Client already closed")]
    Closed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
