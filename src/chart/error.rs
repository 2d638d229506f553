use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("no budget line with id {id:?}")]
    UnknownNode { id: String },
}
