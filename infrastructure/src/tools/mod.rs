//! Expert tools
//!
//! Tools are organized into providers and merged by the [`ToolRegistry`]:
//! - `ncbi`: NCBI E-utilities (`search_ncbi`, `fetch_record`, `summarize_record`)
//! - `sparql`: GeneNetwork RDF through `fetch_data`

pub mod ncbi;
pub mod sparql;

mod registry;

pub use ncbi::NcbiToolProvider;
pub use registry::{DEFAULT_ALIASES, RegistryStats, ToolRegistry};
pub use sparql::SparqlToolProvider;
