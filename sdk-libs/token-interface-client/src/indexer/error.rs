use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("indexer returned an empty result")]
    EmptyResult,

    #[error("Error: `{0}`")]
    CustomError(String),
}
