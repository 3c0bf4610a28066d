pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod sample;
pub mod schema;
pub mod table;

pub use config::{ConfigSource, Destination, PipelineConfig};
pub use error::{EtlError, LoadError, PersistError, Result, TableError};
pub use pipeline::{Pipeline, PipelineResult};
pub use table::{Column, ColumnKind, Table, Value};
