use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read '{path}': {source}")]
    ReadSource {
        path: String,
        source: std::io::Error,
    },
}
