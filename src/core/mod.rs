//! Session state, its persistence facade, and operator profiles.

pub mod access;
pub mod manager;
pub mod session;
pub mod summary;

pub use access::{Feature, Profile};
pub use manager::SessionManager;
pub use session::{ReconciliationSession, CURRENT_SCHEMA_VERSION};
pub use summary::{ShiftSummary, SummaryService};
