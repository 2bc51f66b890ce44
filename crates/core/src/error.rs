use thiserror::Error;

use crate::model::SummaryError;
use crate::model::TopicError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}
