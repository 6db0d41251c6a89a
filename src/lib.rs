pub mod catalog;
pub mod dispatch;
pub mod domains;
pub mod intel;
pub mod probe;
pub mod sink;

// re-export the types every consumer needs
pub use crate::catalog::{Catalog, DetectionStrategy, SiteDescriptor};
pub use crate::sink::{ProbeResult, RunContext, Verdict};
