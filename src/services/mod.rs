// src/services/mod.rs

//! Request-independent business logic.
//!
//! Handlers translate HTTP into calls on these functions; every function
//! receives the store and, where results depend on who is asking, an
//! explicit [`Viewer`].

pub mod feed;
pub mod notify;
pub mod personalize;
pub mod post;
pub mod social;
pub mod toggle;

/// The authenticated user on whose behalf a request is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: String,
}

impl Viewer {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn is(&self, user_id: &str) -> bool {
        self.id == user_id
    }
}
