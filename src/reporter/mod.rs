pub mod spool;
pub mod staleness;
