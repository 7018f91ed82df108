mod config;
mod errors;
mod pipeline;
mod source;

#[cfg(test)]
mod tests;

pub use config::ScoutConfig;
pub use errors::{ScoutError, ScoutResult};
pub use pipeline::{PipelineState, RunReport, Scout};
pub use source::ListingSource;
