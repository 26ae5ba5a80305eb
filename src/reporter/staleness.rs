use std::fmt;

/// Freshness of one suite's spool file as seen by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct StalenessRecord {
    pub suite_id: String,
    pub cache_time: i64,
    pub mtime: i64,
    /// Positive when the spool file is older than the cache time.
    pub overdue: i64,
}

impl StalenessRecord {
    pub fn new(suite_id: &str, cache_time: i64, mtime: i64, now: i64) -> Self {
        Self {
            suite_id: suite_id.to_owned(),
            cache_time,
            mtime,
            overdue: now - mtime - cache_time,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.overdue > 0
    }
}

impl fmt::Display for StalenessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{};{}",
            self.suite_id, self.cache_time, self.mtime, self.overdue
        )
    }
}
