//! Field mapping between path-addressed UI records and flat backend payloads
//!
//! A [`FieldMapping`] is built once per entity type from a declarative table
//! of [`FieldDef`]s and then only read. Each declared UI path maps to exactly
//! one [`BackendTarget`]; several UI paths may share a backend field.
//! Legacy aliases resolve to the spec that declares them and are written
//! through its canonical path. An alias declared by specs with different
//! targets is ambiguous and refused. Unmapped paths fall back to an identity mapping flagged with
//! [`MappingConfidence::Identity`] unless the table forbids it.

mod escrow;
mod routing;

use std::borrow::Cow;
use std::collections::HashMap;

use error_stack::Report;
pub use escrow::{escrow_mapping, escrow_routes};
pub use routing::EntityRoutes;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::path::FieldPath;

/// Declared type of an editable leaf
///
/// Governs both display formatting and the coercion applied before sending.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free text, trimmed
    Text,
    /// Money amount, displayed as `$12,345.50`
    Currency,
    /// Percentage, displayed as `2.5%`
    Percent,
    /// Yes/no flag
    Boolean,
    /// Calendar date, sent as `YYYY-MM-DD`
    Date,
}

/// Where an edited value lands in the backend payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendTarget {
    /// Single flat snake_case key patched on its own
    Flat {
        /// Backend field name, e.g. `purchase_price`
        field: String,
    },
    /// Leaf inside a JSON blob that is read-modify-written in full
    Blob {
        /// Top-level key of the blob, e.g. `checklists`
        blob_key: String,
        /// Path of the leaf inside the blob, e.g. `house.emd`
        sub_path: FieldPath,
    },
}

/// One editable leaf of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    label:      String,
    ui_paths:   Vec<FieldPath>,
    backend:    BackendTarget,
    value_type: ValueType,
}

impl FieldSpec {
    /// Create a spec whose canonical UI path is `canonical`
    pub fn new(
        label: impl Into<String>,
        canonical: FieldPath,
        backend: BackendTarget,
        value_type: ValueType,
    ) -> Self {
        Self {
            label: label.into(),
            ui_paths: vec![canonical],
            backend,
            value_type,
        }
    }

    /// Add a legacy candidate path consulted for display after the canonical one
    #[must_use]
    pub fn with_alias(mut self, alias: FieldPath) -> Self {
        self.ui_paths.push(alias);
        self
    }

    /// Identity spec for a path the table does not declare
    pub fn identity(path: FieldPath) -> Self {
        let field = path.to_string();
        Self::new(
            field.clone(),
            path,
            BackendTarget::Flat { field },
            ValueType::Text,
        )
    }

    /// Human readable label used in messages
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Ordered candidate paths; the first holding a value is displayed
    pub fn ui_paths(&self) -> &[FieldPath] {
        &self.ui_paths
    }

    /// The path edits are written through
    pub fn canonical_path(&self) -> &FieldPath {
        // `ui_paths` is never empty: every constructor seeds the canonical path
        &self.ui_paths[0]
    }

    /// Backend target of this field
    pub const fn backend(&self) -> &BackendTarget {
        &self.backend
    }

    /// Declared value type
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether writes must rebuild a whole blob rather than patch one key
    pub const fn is_blob_field(&self) -> bool {
        matches!(self.backend, BackendTarget::Blob { .. })
    }
}

/// How much a lookup result can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingConfidence {
    /// The path is declared in the table
    Declared,
    /// The path was not declared and is used verbatim as the backend field
    Identity,
}

/// Result of a mapping lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedField<'a> {
    /// Declared spec, or an identity spec built for the lookup
    pub spec:       Cow<'a, FieldSpec>,
    /// Whether the spec came from the table
    pub confidence: MappingConfidence,
}

/// Declarative row of a static mapping table
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Label shown next to the field
    pub label:      &'static str,
    /// Candidate UI paths, canonical first
    pub paths:      &'static [&'static str],
    /// Backend side of the mapping
    pub backend:    BackendDef,
    /// Declared value type
    pub value_type: ValueType,
}

/// Backend side of a [`FieldDef`]
#[derive(Debug, Clone, Copy)]
pub enum BackendDef {
    /// Flat backend field name
    Flat(&'static str),
    /// Blob key; the sub-path is the canonical UI path below the blob key
    Blob(&'static str),
}

impl FieldDef {
    /// Row for a flat backend field
    pub const fn flat(
        label: &'static str,
        paths: &'static [&'static str],
        field: &'static str,
        value_type: ValueType,
    ) -> Self {
        Self {
            label,
            paths,
            backend: BackendDef::Flat(field),
            value_type,
        }
    }

    /// Row for a leaf inside a blob
    pub const fn blob(
        label: &'static str,
        paths: &'static [&'static str],
        blob_key: &'static str,
        value_type: ValueType,
    ) -> Self {
        Self {
            label,
            paths,
            backend: BackendDef::Blob(blob_key),
            value_type,
        }
    }

    /// Convert to a [`FieldSpec`], validating every path
    pub fn to_spec(&self) -> Result<FieldSpec> {
        let (canonical, aliases) = self.paths.split_first().ok_or_else(|| {
            Report::new(Error::invalid(
                "field definition",
                format!("'{}' has no UI path", self.label),
            ))
        })?;
        let canonical = FieldPath::parse(canonical)
            .map_err(|report| report.attach(format!("Field definition: {}", self.label)))?;

        let backend = match self.backend {
            BackendDef::Flat(field) => BackendTarget::Flat {
                field: field.to_string(),
            },
            BackendDef::Blob(blob_key) => {
                let sub_path = canonical.strip_root(blob_key).ok_or_else(|| {
                    Report::new(Error::invalid(
                        "blob field",
                        format!("'{canonical}' does not sit below blob '{blob_key}'"),
                    ))
                })?;
                BackendTarget::Blob {
                    blob_key: blob_key.to_string(),
                    sub_path,
                }
            }
        };

        let mut spec = FieldSpec::new(self.label, canonical, backend, self.value_type);
        for alias in aliases {
            let alias = FieldPath::parse(alias)
                .map_err(|report| report.attach(format!("Field definition: {}", self.label)))?;
            spec = spec.with_alias(alias);
        }
        Ok(spec)
    }
}

/// Where a legacy alias resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AliasEntry {
    /// Every declaring spec shares one backend target; the first one wins
    Spec(usize),
    /// Declared by specs with different backend targets
    Ambiguous,
}

/// Static per-entity lookup from UI path to [`FieldSpec`]
#[derive(Debug, Clone)]
pub struct FieldMapping {
    routes:            EntityRoutes,
    specs:             Vec<FieldSpec>,
    index:             HashMap<FieldPath, usize>,
    aliases:           HashMap<FieldPath, AliasEntry>,
    identity_fallback: bool,
}

impl FieldMapping {
    /// Start building a mapping for the entity described by `routes`
    pub fn builder(routes: EntityRoutes) -> FieldMappingBuilder {
        FieldMappingBuilder {
            mapping: Self {
                routes,
                specs: Vec::new(),
                index: HashMap::new(),
                aliases: HashMap::new(),
                identity_fallback: true,
            },
        }
    }

    /// Build a mapping from a declarative table
    pub fn from_defs(routes: EntityRoutes, defs: &[FieldDef]) -> Result<Self> {
        defs.iter()
            .try_fold(Self::builder(routes), |builder, def| {
                builder.field(def.to_spec()?)
            })
            .map(FieldMappingBuilder::build)
    }

    /// Routing data for this entity
    pub const fn routes(&self) -> &EntityRoutes {
        &self.routes
    }

    /// Declared specs in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter()
    }

    /// Declared spec for a canonical UI path or an unambiguous alias
    pub fn spec(&self, path: &str) -> Option<&FieldSpec> {
        let index = match self.index.get(path) {
            Some(&index) => index,
            None => match self.aliases.get(path)? {
                AliasEntry::Spec(index) => *index,
                AliasEntry::Ambiguous => return None,
            },
        };
        self.specs.get(index)
    }

    /// Whether `path` is an alias declared for different backend targets
    pub fn is_ambiguous(&self, path: &str) -> bool {
        !self.index.contains_key(path)
            && self.aliases.get(path) == Some(&AliasEntry::Ambiguous)
    }

    /// Every declared UI path whose edits land on the flat backend `field`
    pub fn paths_for_backend_field(&self, field: &str) -> Vec<&FieldPath> {
        self.specs
            .iter()
            .filter(|spec| matches!(spec.backend(), BackendTarget::Flat { field: f } if f == field))
            .map(FieldSpec::canonical_path)
            .collect()
    }

    /// Look up the spec for `path`
    ///
    /// Aliases resolve to their declaring spec. Ambiguous aliases are an
    /// [`Error::Mapping`]. Unmapped paths produce an identity spec flagged
    /// [`MappingConfidence::Identity`], or [`Error::Mapping`] when identity
    /// fallback is disabled for this table.
    pub fn lookup(&self, path: &str) -> Result<MappedField<'_>> {
        if let Some(spec) = self.spec(path) {
            return Ok(MappedField {
                spec:       Cow::Borrowed(spec),
                confidence: MappingConfidence::Declared,
            });
        }

        if self.is_ambiguous(path) {
            error!(
                "'{path}' is an alias of several {} fields with different backend targets",
                self.routes.collection
            );
            return Err(Report::new(Error::Mapping(format!(
                "'{path}' is ambiguous; edit it through its section path"
            )))
            .attach(format!("Collection: {}", self.routes.collection)));
        }

        if !self.identity_fallback {
            error!(
                "mapping gap: '{path}' is not declared for {}",
                self.routes.collection
            );
            return Err(Report::new(Error::unmapped(path))
                .attach(format!("Collection: {}", self.routes.collection)));
        }

        let field_path = FieldPath::parse(path)?;
        warn!(
            "'{path}' is not declared for {}; using it verbatim as the backend field",
            self.routes.collection
        );
        Ok(MappedField {
            spec:       Cow::Owned(FieldSpec::identity(field_path)),
            confidence: MappingConfidence::Identity,
        })
    }
}

/// Builder enforcing the one-path-one-target rule
#[derive(Debug)]
pub struct FieldMappingBuilder {
    mapping: FieldMapping,
}

impl FieldMappingBuilder {
    /// Register a spec under its canonical path and its aliases
    ///
    /// Canonical paths always win over aliases of other specs.
    pub fn field(mut self, spec: FieldSpec) -> Result<Self> {
        let path = spec.canonical_path().clone();
        if let Some(existing) = self
            .mapping
            .index
            .get(&path)
            .and_then(|&i| self.mapping.specs.get(i))
        {
            return Err(Report::new(Error::InvalidState(format!(
                "'{path}' is already mapped to {:?}",
                existing.backend()
            ))));
        }
        debug!("mapping '{path}' -> {:?}", spec.backend());
        let position = self.mapping.specs.len();
        self.mapping.aliases.remove(&path);
        self.mapping.index.insert(path, position);

        for alias in spec.ui_paths().iter().skip(1) {
            if self.mapping.index.contains_key(alias) {
                continue;
            }
            let entry = match self.mapping.aliases.get(alias) {
                None => AliasEntry::Spec(position),
                Some(AliasEntry::Spec(first))
                    if self
                        .mapping
                        .specs
                        .get(*first)
                        .is_some_and(|declared| declared.backend() == spec.backend()) =>
                {
                    AliasEntry::Spec(*first)
                }
                Some(_) => {
                    debug!("alias '{alias}' is declared for different backend targets");
                    AliasEntry::Ambiguous
                }
            };
            self.mapping.aliases.insert(alias.clone(), entry);
        }

        self.mapping.specs.push(spec);
        Ok(self)
    }

    /// Allow or forbid identity fallback for unmapped paths (allowed by default)
    #[must_use]
    pub const fn identity_fallback(mut self, allow: bool) -> Self {
        self.mapping.identity_fallback = allow;
        self
    }

    /// Finish building
    pub fn build(self) -> FieldMapping {
        self.mapping
    }
}
