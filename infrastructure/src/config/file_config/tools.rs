//! Expert tool configuration (`[tools]` section)
//!
//! ```toml
//! [tools]
//! ncbi_base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! email = "someone@example.org"
//! sparql_endpoint = "https://rdf.genenetwork.org/sparql/"
//! timeout_seconds = 60
//!
//! [tools.aliases]
//! pubmed = "search_ncbi"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// NCBI E-utilities base URL
    pub ncbi_base_url: String,
    /// Contact address NCBI asks clients to send
    pub email: Option<String>,
    pub ncbi_api_key: Option<String>,
    pub sparql_endpoint: String,
    /// Per-call tool timeout
    pub timeout_seconds: u64,
    /// Extra alias -> tool name mappings
    pub aliases: BTreeMap<String, String>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            ncbi_base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string(),
            email: None,
            ncbi_api_key: None,
            sparql_endpoint: "https://rdf.genenetwork.org/sparql/".to_string(),
            timeout_seconds: 60,
            aliases: BTreeMap::new(),
        }
    }
}
