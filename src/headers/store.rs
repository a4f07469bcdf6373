//! Header storage primitives.
//!
//! # Responsibilities
//! - Define the operations the injector needs from a request's header set
//! - Provide an ordered list implementation (`HeaderList`)
//! - Adapt `http::HeaderMap` so live proxy requests can be mutated
//!
//! # Design Decisions
//! - Handles and pending fields are move-only: removing or appending consumes them,
//!   so each one is released exactly once on every path
//! - Key lookup is ASCII case-insensitive in both implementations, as in HTTP
//! - Only the first matching field is ever returned or removed
//! - Removal keeps every other field in its original order

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

/// Failure reported by a header store primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("invalid header name '{0}'")]
    InvalidName(String),

    #[error("invalid value for header '{0}'")]
    InvalidValue(String),

    #[error("header set is full ({0} fields)")]
    CapacityExceeded(usize),
}

/// A single header entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub key: String,
    pub value: String,
}

impl HeaderField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The header-set operations consumed by the injector.
pub trait HeaderStore {
    /// Locator for an existing field.
    type Handle;
    /// A field created for this store but not yet part of it.
    type Field;

    /// Find the first field whose key matches.
    fn find_field(&self, key: &str) -> Option<Self::Handle>;

    /// Remove the located field. Other fields keep their relative order.
    fn remove_field(&mut self, handle: Self::Handle);

    /// Create a detached field holding its own copy of `key` and `value`.
    fn create_field(&self, key: &str, value: &str) -> Result<Self::Field, FieldError>;

    /// Append a detached field at the end of the set.
    fn append_field(&mut self, field: Self::Field) -> Result<(), FieldError>;
}

/// Position of a field inside a `HeaderList`.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldHandle(usize);

/// An ordered list of header fields with an optional size limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    fields: Vec<HeaderField>,
    max_fields: Option<usize>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list that refuses appends beyond `max_fields` entries.
    pub fn with_capacity_limit(max_fields: usize) -> Self {
        Self {
            fields: Vec::new(),
            max_fields: Some(max_fields),
        }
    }

    /// Push a field unconditionally (setup helper, bypasses the limit).
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(HeaderField::new(key, value));
    }

    pub fn fields(&self) -> &[HeaderField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All values stored under `key`, in order.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.key.eq_ignore_ascii_case(key))
            .map(|f| f.value.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| HeaderField::new(k, v)).collect(),
            max_fields: None,
        }
    }
}

impl HeaderStore for HeaderList {
    type Handle = FieldHandle;
    type Field = HeaderField;

    fn find_field(&self, key: &str) -> Option<FieldHandle> {
        self.fields
            .iter()
            .position(|f| f.key.eq_ignore_ascii_case(key))
            .map(FieldHandle)
    }

    fn remove_field(&mut self, handle: FieldHandle) {
        if handle.0 < self.fields.len() {
            self.fields.remove(handle.0);
        }
    }

    fn create_field(&self, key: &str, value: &str) -> Result<HeaderField, FieldError> {
        Ok(HeaderField::new(key, value))
    }

    fn append_field(&mut self, field: HeaderField) -> Result<(), FieldError> {
        if let Some(max) = self.max_fields {
            if self.fields.len() >= max {
                return Err(FieldError::CapacityExceeded(max));
            }
        }
        self.fields.push(field);
        Ok(())
    }
}

/// Locator for the first value stored under a name in a `HeaderMap`.
#[derive(Debug)]
pub struct MapHandle(HeaderName);

impl HeaderStore for HeaderMap {
    type Handle = MapHandle;
    type Field = (HeaderName, HeaderValue);

    fn find_field(&self, key: &str) -> Option<MapHandle> {
        // A key that is not a valid header name cannot be present.
        let name = HeaderName::from_bytes(key.as_bytes()).ok()?;
        if self.contains_key(&name) {
            Some(MapHandle(name))
        } else {
            None
        }
    }

    fn remove_field(&mut self, handle: MapHandle) {
        let MapHandle(name) = handle;
        // `HeaderMap::remove` swaps the last entry into the hole, so rebuild in order.
        let old = std::mem::take(self);
        let mut current: Option<HeaderName> = None;
        let mut removed = false;
        for (key, value) in old {
            if key.is_some() {
                current = key;
            }
            let Some(key) = current.as_ref() else {
                continue;
            };
            if !removed && *key == name {
                removed = true;
                continue;
            }
            self.append(key.clone(), value);
        }
    }

    fn create_field(&self, key: &str, value: &str) -> Result<(HeaderName, HeaderValue), FieldError> {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| FieldError::InvalidName(key.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| FieldError::InvalidValue(key.to_string()))?;
        Ok((name, value))
    }

    fn append_field(&mut self, field: (HeaderName, HeaderValue)) -> Result<(), FieldError> {
        let (name, value) = field;
        let len = self.len();
        self.try_append(name, value)
            .map(|_| ())
            .map_err(|_| FieldError::CapacityExceeded(len))
    }
}
