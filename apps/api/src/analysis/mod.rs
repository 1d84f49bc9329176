//! Keyword Matcher / Compatibility Scorer: weighted fit of one résumé against one job.

pub mod ats;
pub mod handlers;
pub mod keywords;
pub mod policy;
pub mod scorer;
pub mod suggestions;
