//! Publishing port trait.

use crate::domain::error::CycleError;

/// Finished page body handed to whatever publishes it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub title: String,
    pub html: String,
}

pub trait PublishPort {
    fn publish(&self, page: &PageContent) -> Result<(), CycleError>;
}
