pub mod config;
pub mod error;
pub mod extraction;
pub mod pipeline;
pub mod report;
pub mod textgrid_io;
pub mod timeline;
pub mod types;

pub use config::VotConfig;
pub use error::{SkipReason, StructuralError, VotError};
pub use pipeline::batch::{run_batch, BatchSummary};
pub use pipeline::builder::VotExtractorBuilder;
pub use pipeline::runtime::{DocumentOutcome, SkippedWord, VotExtractor};
pub use pipeline::traits::{BoundaryResolver, TemplateMatcher};
pub use report::{OutputFormat, ResultTable, CSV_HEADER};
pub use textgrid_io::{annotated_output_path, list_textgrids, read_document, write_annotated, LoadedDocument};
pub use timeline::{Document, Interval, Tier, TierKind, TierRole};
pub use types::{DecisionBranch, TimeSpan, VotMeasurement, VotPolarity, VotRow, VowelContext};
