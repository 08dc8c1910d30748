//! Operator selection and context validation.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::Catalog;

/// Pre-flight failures. Nothing is sent when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no items selected")]
    NoItemsSelected,
    #[error("no valid items selected")]
    NoValidItems,
    #[error("invalid context")]
    InvalidContext,
    #[error("invalid context: unknown server {0}")]
    UnknownContext(i64),
    #[error("unknown product group: {0}")]
    UnknownGroup(String),
}

/// Ordered set of distinct item identifiers. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<i64>,
}

impl Selection {
    /// Build from already-parsed identifiers, dropping repeats.
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Result<Self, ValidationError> {
        let mut builder = SelectionBuilder::default();
        builder.extend_ids(ids);
        builder.build()
    }

    /// Build from raw operator tokens. Tokens that are not integers are skipped.
    pub fn parse<I, S>(raw: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = SelectionBuilder::default();
        for token in raw {
            builder.push_raw(token.as_ref());
        }
        builder.build()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Accumulates ids from groups and raw tokens before validation.
#[derive(Debug, Default)]
pub struct SelectionBuilder {
    ids: Vec<i64>,
    seen: HashSet<i64>,
    offered: usize,
    rejected: Vec<String>,
}

impl SelectionBuilder {
    pub fn push_id(&mut self, id: i64) {
        self.offered += 1;
        if self.seen.insert(id) {
            self.ids.push(id);
        }
    }

    pub fn extend_ids(&mut self, ids: impl IntoIterator<Item = i64>) {
        for id in ids {
            self.push_id(id);
        }
    }

    pub fn push_raw(&mut self, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            return;
        }
        match token.parse::<i64>() {
            Ok(id) => self.push_id(id),
            Err(_) => {
                self.offered += 1;
                self.rejected.push(token.to_string());
            }
        }
    }

    /// Add every product of a named catalog group.
    pub fn push_group(&mut self, catalog: &Catalog, name: &str) -> Result<(), ValidationError> {
        let group = catalog
            .group(name)
            .ok_or_else(|| ValidationError::UnknownGroup(name.to_string()))?;
        self.extend_ids(group.products.iter().copied());
        Ok(())
    }

    /// Add every catalog product, in catalog order.
    pub fn push_all(&mut self, catalog: &Catalog) {
        self.extend_ids(catalog.products.keys().copied());
    }

    pub fn build(self) -> Result<Selection, ValidationError> {
        if self.offered == 0 {
            return Err(ValidationError::NoItemsSelected);
        }
        if !self.rejected.is_empty() {
            tracing::warn!("Ignoring invalid item ids: {}", self.rejected.join(", "));
        }
        if self.ids.is_empty() {
            return Err(ValidationError::NoValidItems);
        }
        Ok(Selection { ids: self.ids })
    }
}

/// The identifier shared by every item of one submission (the target server).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context(i64);

impl Context {
    /// Resolve a context id against the catalog.
    pub fn resolve(id: Option<i64>, catalog: &Catalog) -> Result<Self, ValidationError> {
        let id = id.ok_or(ValidationError::InvalidContext)?;
        if !catalog.is_known_server(id) {
            return Err(ValidationError::UnknownContext(id));
        }
        Ok(Self(id))
    }

    /// Parse and resolve a raw context value.
    pub fn parse(raw: Option<&str>, catalog: &Catalog) -> Result<Self, ValidationError> {
        let id = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::InvalidContext)?
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidContext)?;
        Self::resolve(Some(id), catalog)
    }

    pub fn id(&self) -> i64 {
        self.0
    }
}
