//! Crawler rules: pure admission and validity predicates.
mod image;
mod ledger;
mod rules;
mod scope;

pub use image::{ImageDimensions, ImageRules, DEFAULT_IMAGE_EXTENSIONS};
pub use ledger::AdmissionLedger;
pub use rules::{has_fragment, CrawlRules, ProcessorRules};
pub use scope::ScopeRules;
