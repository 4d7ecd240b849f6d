//! Prefix → namespace table for turning RDF names into links

/// Prefixes used across the GeneNetwork RDF store
pub const NAMESPACES: &[(&str, &str)] = &[
    ("gn", "http://rdf.genenetwork.org/v1/id"),
    ("gnc", "http://rdf.genenetwork.org/v1/category"),
    ("owl", "http://www.w3.org/2002/07/owl"),
    ("gnt", "http://rdf.genenetwork.org/v1/term"),
    ("skos", "http://www.w3.org/2004/02/skos/core"),
    ("xkos", "http://rdf-vocabulary.ddialliance.org/xkos"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema"),
    ("taxon", "http://purl.uniprot.org/taxonomy"),
    ("dcat", "http://www.w3.org/ns/dcat"),
    ("dct", "http://purl.org/dc/terms"),
    ("xsd", "http://www.w3.org/2001/XMLSchema"),
    ("sdmx-measure", "http://purl.org/linked-data/sdmx/2009/measure"),
    ("qb", "http://purl.org/linked-data/cube"),
    ("pubmed", "http://rdf.ncbi.nlm.nih.gov/pubmed"),
    ("v", "http://www.w3.org/2006/vcard/ns"),
    ("foaf", "http://xmlns.com/foaf/0.1"),
    ("geoSeries", "http://www.ncbi.nlm.nih.gov/geo/query/acc.cgi?acc"),
];

/// Expand `gn:trait_1` to `http://rdf.genenetwork.org/v1/id/trait_1`.
///
/// `geoSeries` joins with `=`, every other namespace with `/`. Strings with
/// an unknown prefix, or that are already absolute URLs, come back unchanged.
pub fn expand_prefixed(name: &str) -> String {
    let name = name.trim();
    if name.contains("://") {
        return name.to_string();
    }
    let Some((prefix, local)) = name.split_once(':') else {
        return name.to_string();
    };
    match NAMESPACES.iter().find(|(p, _)| *p == prefix) {
        Some(("geoSeries", namespace)) => format!("{}={}", namespace, local),
        Some((_, namespace)) => format!("{}/{}", namespace, local),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand() {
        assert_eq!(
            expand_prefixed("gn:trait_BXDPublish_16339"),
            "http://rdf.genenetwork.org/v1/id/trait_BXDPublish_16339"
        );
        assert_eq!(
            expand_prefixed("geoSeries:GSE1234"),
            "http://www.ncbi.nlm.nih.gov/geo/query/acc.cgi?acc=GSE1234"
        );
        assert_eq!(
            expand_prefixed("sdmx-measure:obsValue"),
            "http://purl.org/linked-data/sdmx/2009/measure/obsValue"
        );
    }

    #[test]
    fn test_expand_passthrough() {
        assert_eq!(expand_prefixed("https://cd.genenetwork.org/x"), "https://cd.genenetwork.org/x");
        assert_eq!(expand_prefixed("unknown:thing"), "unknown:thing");
        assert_eq!(expand_prefixed("no prefix"), "no prefix");
    }
}
