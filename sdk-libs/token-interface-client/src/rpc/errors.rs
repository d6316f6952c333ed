use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Error: `{0}`")]
    CustomError(String),

    #[error("Account {0} does not exist")]
    AccountDoesNotExist(String),
}
