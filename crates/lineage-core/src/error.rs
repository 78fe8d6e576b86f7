pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid lineage payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}
