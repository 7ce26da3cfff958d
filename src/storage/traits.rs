use crate::errors::CollectorResult;

/// Persisted set of article IDs that already reached the sink
#[cfg_attr(test, mockall::automock)]
pub trait SeenStore {
    fn contains(&self, id: &str) -> CollectorResult<bool>;
    fn add(&mut self, id: &str) -> CollectorResult<()>;
    /// Flush to disk; a no-op for stores that write through
    fn save(&mut self) -> CollectorResult<()>;
    fn len(&self) -> CollectorResult<usize>;
}
