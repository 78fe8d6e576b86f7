//! Mapping from activated nodes to catalog locations.

use lineage_core::{CatalogRef, GraphNode};
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    pub qualified_name: String,
    pub route: String,
}

/// Builds the location of a catalog object.
pub trait CatalogNavigator {
    /// `None` when the object cannot be addressed.
    fn route_for(&self, catalog: &CatalogRef) -> Option<String>;
}

/// Navigation target for a node. External nodes have no catalog identity and never navigate.
pub fn target_for(node: &GraphNode, navigator: &dyn CatalogNavigator) -> Option<NavigationTarget> {
    if node.is_external() {
        return None;
    }
    let catalog = node.catalog.as_ref()?;
    let route = navigator.route_for(catalog)?;
    Some(NavigationTarget {
        qualified_name: node.qualified_name.clone(),
        route,
    })
}

/// `<prefix>/<source>/<schema>/<object>`, each part percent-encoded as a path segment.
///
/// The prefix is either a path (`/catalog`), which yields relative routes, or an absolute URL,
/// which yields absolute ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNavigator {
    prefix: String,
}

impl Default for PathNavigator {
    fn default() -> Self {
        Self::new("/catalog")
    }
}

// Only used to borrow `Url`'s path-segment encoder for relative prefixes.
const LOCAL_ORIGIN: &str = "http://localhost";

impl PathNavigator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl CatalogNavigator for PathNavigator {
    fn route_for(&self, catalog: &CatalogRef) -> Option<String> {
        let relative = self.prefix.starts_with('/') || self.prefix.is_empty();
        let mut url = if relative {
            Url::parse(LOCAL_ORIGIN).ok()?
        } else {
            Url::parse(&self.prefix).ok()?
        };
        {
            let mut segments = url.path_segments_mut().ok()?;
            segments.pop_if_empty();
            if relative {
                segments.extend(self.prefix.split('/').filter(|s| !s.is_empty()));
            }
            segments.push(&catalog.source_name);
            segments.push(&catalog.schema_name);
            segments.push(&catalog.object_name);
        }
        Some(if relative {
            url.path().to_string()
        } else {
            url.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(source: &str, schema: &str, object: &str) -> CatalogRef {
        CatalogRef {
            source_name: source.to_string(),
            schema_name: schema.to_string(),
            object_name: object.to_string(),
        }
    }

    #[test]
    fn default_route_is_a_catalog_path() {
        let nav = PathNavigator::default();
        assert_eq!(
            nav.route_for(&catalog("warehouse", "public", "users")).as_deref(),
            Some("/catalog/warehouse/public/users")
        );
    }

    #[test]
    fn route_parts_are_percent_encoded() {
        let nav = PathNavigator::default();
        let route = nav
            .route_for(&catalog("ware house", "a/b", "users?x"))
            .unwrap();
        assert_eq!(route, "/catalog/ware%20house/a%2Fb/users%3Fx");
    }

    #[test]
    fn absolute_prefix_yields_absolute_routes() {
        let nav = PathNavigator::new("https://catalog.example.com/browse/");
        assert_eq!(
            nav.route_for(&catalog("w", "s", "o")).as_deref(),
            Some("https://catalog.example.com/browse/w/s/o")
        );
    }
}
