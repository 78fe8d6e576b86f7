#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] lineage_layered::LayoutError),
    #[error("layout placed {placed} of {expected} nodes")]
    IncompletePlacement { placed: usize, expected: usize },
    #[error("layout returned {routed} routes for {expected} edges")]
    IncompleteRouting { routed: usize, expected: usize },
    #[error("layout produced a non-finite position for node `{id}`")]
    NonFinitePosition { id: String },
    #[error(transparent)]
    Model(#[from] lineage_core::Error),
    #[error("positioned graph JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
