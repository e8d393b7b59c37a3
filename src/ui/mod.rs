//! Console presentation: banner and result listing.

pub mod banner;
pub mod report;
