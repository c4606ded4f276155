use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Collision(String),

    #[error("{0}")]
    NotFound(String),

    #[error("dnscmd did not respond within {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Administration(String),
}
