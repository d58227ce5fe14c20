use std::fmt::Display;

use incsat_core::session::SessionError;
use thiserror::Error;

use crate::parsers::dimacs::DimacsParseError;

pub(crate) type IncsatResult<T> = Result<T, IncsatError>;

#[derive(Error, Debug)]
pub(crate) enum IncsatError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The file {0} is not supported.")]
    InvalidInstanceFile(String),
    #[error("The dimacs file was invalid, more details: {0}")]
    InvalidDimacs(#[from] DimacsParseError),
    #[error("The session rejected an operation, more details: {0}")]
    Session(#[from] SessionError),
    #[error("A certificate can only be produced for a single instance, but {0} were given.")]
    CertificateForBatch(usize),
}

impl IncsatError {
    pub(crate) fn invalid_instance(path: impl Display) -> Self {
        Self::InvalidInstanceFile(format!("{}", path))
    }
}
