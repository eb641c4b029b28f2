//! Endpoint routing data for one entity type

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::BackendTarget;

/// Where patches for one entity type are sent
///
/// Flat fields and blobs without an entry in `sub_resources` go to the entity
/// root (`/escrows/<id>`); listed blobs go to their sub-resource
/// (`/escrows/<id>/people`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRoutes {
    /// Plural collection segment, e.g. `escrows`
    pub collection:    String,
    /// Prefix the UI adds to ids that the backend does not know about
    #[serde(default)]
    pub id_prefix:     Option<String>,
    /// Blob key to sub-resource segment
    #[serde(default)]
    pub sub_resources: BTreeMap<String, String>,
}

impl EntityRoutes {
    /// Routes for `collection` with every field going to the entity root
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection:    collection.into(),
            id_prefix:     None,
            sub_resources: BTreeMap::new(),
        }
    }

    /// Strip `prefix` from record ids before building endpoints
    #[must_use]
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = Some(prefix.into());
        self
    }

    /// Route patches of `blob_key` to `/<collection>/<id>/<sub_resource>`
    #[must_use]
    pub fn with_sub_resource(
        mut self,
        blob_key: impl Into<String>,
        sub_resource: impl Into<String>,
    ) -> Self {
        self.sub_resources
            .insert(blob_key.into(), sub_resource.into());
        self
    }

    /// Sub-resource for a backend target, `None` meaning the entity root
    pub fn sub_resource_for(&self, target: &BackendTarget) -> Option<&str> {
        match target {
            BackendTarget::Flat { .. } => None,
            BackendTarget::Blob { blob_key, .. } => {
                self.sub_resources.get(blob_key).map(String::as_str)
            }
        }
    }

    /// Remove the UI-only id prefix, if configured and present
    pub fn clean_id<'a>(&self, raw: &'a str) -> &'a str {
        self.id_prefix
            .as_deref()
            .and_then(|prefix| raw.strip_prefix(prefix))
            .unwrap_or(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::FieldPath;

    #[test]
    fn test_clean_id() {
        let routes = EntityRoutes::new("escrows").with_id_prefix("escrow-");
        assert_eq!(routes.clean_id("escrow-42"), "42");
        assert_eq!(routes.clean_id("42"), "42");
        assert_eq!(EntityRoutes::new("escrows").clean_id("escrow-42"), "escrow-42");
    }

    #[test]
    fn test_sub_resource_for() {
        let routes = EntityRoutes::new("escrows").with_sub_resource("people", "people");
        let people = BackendTarget::Blob {
            blob_key: "people".to_string(),
            sub_path: FieldPath::parse("listingAgent").unwrap(),
        };
        let timeline = BackendTarget::Blob {
            blob_key: "timeline".to_string(),
            sub_path: FieldPath::parse("closingDate").unwrap(),
        };
        let flat = BackendTarget::Flat {
            field: "people".to_string(),
        };
        assert_eq!(routes.sub_resource_for(&people), Some("people"));
        assert_eq!(routes.sub_resource_for(&timeline), None);
        assert_eq!(routes.sub_resource_for(&flat), None);
    }

    #[test]
    fn test_routes_deserialize_with_defaults() {
        let routes: EntityRoutes =
            serde_json::from_str(r#"{ "collection": "listings" }"#).unwrap();
        assert_eq!(routes, EntityRoutes::new("listings"));
    }
}
