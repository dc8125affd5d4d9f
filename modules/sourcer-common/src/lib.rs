pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::SourcerError;
pub use types::{
    AuditRecord, EngagementResult, Identity, Platform, PostStats, ProfileSnapshot,
    QualifyingRecord, Thresholds,
};
