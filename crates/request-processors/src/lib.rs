mod track;
pub use track::*;

use std::ops::Deref;
use uuid::Uuid;

// TaskId
#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn generate() -> Self {
        TaskId(Uuid::new_v4())
    }
}

impl Deref for TaskId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// StableId
/// Provider identifier of a media item, e.g. a video id.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct StableId(String);

impl StableId {
    /// Returns `None` for blank identifiers, they can't be turned into a locator later.
    pub fn new(raw: &str) -> Option<Self> {
        let id = raw.trim();

        if id.is_empty() {
            return None;
        }

        Some(StableId(id.to_string()))
    }
}

impl Deref for StableId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for StableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
