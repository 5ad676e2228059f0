use thiserror::Error;

/// CLI errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid instruction word '{0}': expected up to 8 hex digits")]
    InvalidWord(String),
    #[error("no instructions given: pass hex words or --bin FILE")]
    NoInput,
    #[error("code size {0} is not a multiple of 4 bytes")]
    UnalignedCode(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
