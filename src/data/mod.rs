//! Data module - CSV loading, aggregation and reshaping

mod aggregator;
mod cache;
mod loader;
mod processor;

pub use aggregator::{aggregate, aggregate_frame, AggregateError, RawRecord, WideTable};
pub use cache::{AggregateCache, CacheError};
pub use loader::{load_records, LoaderError, SourceFingerprint};
pub use processor::{
    DataProcessor, ExportView, LongRow, LongView, NarrowTable, PresentError, Presentation,
};
