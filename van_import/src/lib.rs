mod config;
pub mod classify;
pub mod pipeline;
pub mod router;
pub mod transform;
pub mod translate;

pub use crate::classify::{Classifier, JURISDICTION_COLUMN};
pub use crate::config::*;
pub use crate::pipeline::{Driver, DriverState, InputRecord, RunSummary, SkippedRow};
pub use crate::router::{DestinationFactory, GroupSummary, OutputGroup, Router};
pub use crate::transform::{write_import_row, Transformer};
pub use crate::translate::{translate, TranslationTable, Vocabulary};
