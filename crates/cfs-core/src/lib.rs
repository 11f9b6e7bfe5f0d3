pub mod dataset;
pub mod error;
pub mod scoring;
pub mod types;

pub use dataset::loader::{load, load_companies, DatasetLoad, LoaderOptions};
pub use dataset::record::{CompanyDataset, CompanyRecord};
pub use error::CfsError;
pub use scoring::calculator::{compute_composite, CalculatorInputs, MetricKey};
pub use types::*;

/// Standard result type for all CFS operations
pub type CfsResult<T> = Result<T, CfsError>;
