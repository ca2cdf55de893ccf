//! CMS response normalization.
//!
//! The catalog API has shipped two conventions over its lifetime:
//!
//! ```text
//! nested:  { "id": 1, "attributes": { "name": "Tea", "image": { "data": [ { "id": 4, "attributes": { "url": ... } } ] } } }
//! flat:    { "id": 1, "name": "Tea", "image": [ { "url": ... } ] }
//! ```
//!
//! Each record and each media field is classified once into a tagged
//! shape ([`Record`], [`MediaShape`]) and converted into the canonical
//! models. Everything past this module works on [`Product`] and
//! [`Category`] only.
//!
//! Nothing here panics or errors on partial media: absent or malformed
//! image metadata yields no [`ImageRecord`]. Product records are validated
//! and rejected with a typed [`Rejection`] so callers can count and log
//! the drop.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Category, CategoryRef, EntityId, ImageRecord, ImageVariant, Product};

/// Why a response envelope could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("response body is not a JSON object")]
    NotAnObject,
    #[error("response is missing the top-level `data` field")]
    MissingData,
    #[error("top-level `data` field is not a list")]
    NotAList,
}

/// Why a single record was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("missing or empty id")]
    MissingId,
    #[error("missing or empty name")]
    MissingName,
    #[error("`available` is not a boolean")]
    AvailabilityNotBoolean,
    #[error("`price` is not a number")]
    PriceNotNumeric,
}

/// A record that failed validation, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    /// Position in the envelope's `data` list.
    pub index: usize,
    pub id: Option<String>,
    pub reason: Rejection,
}

/// Result of normalizing a whole envelope.
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub items: Vec<T>,
    /// Number of records the envelope carried.
    pub received: usize,
    pub rejected: Vec<Rejected>,
}

impl<T> Normalized<T> {
    pub fn valid(&self) -> usize {
        self.items.len()
    }

    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Shapes
// ═══════════════════════════════════════════════════════════════════════

/// One CMS record, classified by where its fields live.
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    /// Fields under an `attributes` object; `id` stays at the top level.
    Nested {
        top: &'a Map<String, Value>,
        attributes: &'a Map<String, Value>,
    },
    /// Fields directly on the record.
    Flat(&'a Map<String, Value>),
}

impl<'a> Record<'a> {
    pub fn classify(value: &'a Value) -> Option<Self> {
        let top = value.as_object()?;
        Some(match top.get("attributes").and_then(Value::as_object) {
            Some(attributes) => Record::Nested { top, attributes },
            None => Record::Flat(top),
        })
    }

    fn top(&self) -> &'a Map<String, Value> {
        match *self {
            Record::Nested { top, .. } => top,
            Record::Flat(top) => top,
        }
    }

    pub fn id(&self) -> Option<EntityId> {
        self.top().get("id").and_then(parse_id)
    }

    /// Look a field up where this shape keeps it.
    ///
    /// Nested records fall back to the top level for fields the API
    /// promotes there (`documentId` on newer versions).
    pub fn field(&self, name: &str) -> Option<&'a Value> {
        match *self {
            Record::Nested { top, attributes } => attributes
                .get(name)
                .filter(|v| !v.is_null())
                .or_else(|| top.get(name))
                .filter(|v| !v.is_null()),
            Record::Flat(top) => top.get(name).filter(|v| !v.is_null()),
        }
    }

    fn str_field(&self, name: &str) -> Option<String> {
        self.field(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// How a media field is laid out.
#[derive(Debug, Clone)]
pub enum MediaShape<'a> {
    /// `{ "data": entry }` or `{ "data": [entry, ...] }`.
    Envelope(Vec<Record<'a>>),
    /// `[entry, ...]`.
    List(Vec<Record<'a>>),
    /// A bare media object.
    Single(Record<'a>),
    Absent,
}

impl<'a> MediaShape<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        let Some(value) = value else {
            return MediaShape::Absent;
        };
        match value {
            Value::Array(entries) => MediaShape::List(records(entries)),
            Value::Object(map) if map.contains_key("data") => match map.get("data") {
                Some(Value::Array(entries)) => MediaShape::Envelope(records(entries)),
                Some(entry @ Value::Object(_)) => {
                    MediaShape::Envelope(Record::classify(entry).into_iter().collect())
                }
                _ => MediaShape::Absent,
            },
            Value::Object(_) => match Record::classify(value) {
                Some(record) => MediaShape::Single(record),
                None => MediaShape::Absent,
            },
            _ => MediaShape::Absent,
        }
    }

    pub fn into_images(self) -> Vec<ImageRecord> {
        let entries = match self {
            MediaShape::Envelope(entries) | MediaShape::List(entries) => entries,
            MediaShape::Single(entry) => vec![entry],
            MediaShape::Absent => return Vec::new(),
        };
        entries
            .iter()
            .map(image_from_record)
            .filter(|img| !img.is_empty())
            .collect()
    }
}

fn records(entries: &[Value]) -> Vec<Record<'_>> {
    entries.iter().filter_map(Record::classify).collect()
}

/// Normalize any supported media layout into image records.
pub fn normalize_media(value: Option<&Value>) -> Vec<ImageRecord> {
    MediaShape::classify(value).into_images()
}

fn image_from_record(record: &Record<'_>) -> ImageRecord {
    let formats = record
        .field("formats")
        .and_then(Value::as_object)
        .map(|formats| {
            formats
                .iter()
                .filter_map(|(name, v)| {
                    let url = v.get("url")?.as_str()?.trim();
                    if url.is_empty() {
                        return None;
                    }
                    Some((
                        name.clone(),
                        ImageVariant {
                            url: url.to_string(),
                            width: dimension(v.get("width")),
                            height: dimension(v.get("height")),
                        },
                    ))
                })
                .collect::<BTreeMap<_, _>>()
        })
        .unwrap_or_default();

    ImageRecord {
        url: record.str_field("url"),
        alternative_text: record.str_field("alternativeText"),
        formats,
    }
}

fn dimension(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

/// Unwrap `{ "data": x }` relation envelopes; bare objects pass through.
fn relation(value: Option<&Value>) -> Option<&Value> {
    let value = value?;
    match value.as_object() {
        Some(map) if map.contains_key("data") => map.get("data").filter(|v| v.is_object()),
        Some(_) => Some(value),
        None => None,
    }
}

/// Read an id from a JSON value. Integers stay numeric.
pub fn parse_id(value: &Value) -> Option<EntityId> {
    match value {
        Value::Number(n) => Some(match n.as_u64() {
            Some(n) => EntityId::Numeric(n),
            None => EntityId::Text(n.to_string()),
        }),
        Value::String(s) => Some(EntityId::Text(s.trim().to_string())),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Envelope
// ═══════════════════════════════════════════════════════════════════════

/// Borrow the record list out of a `{ "data": [...] }` envelope.
pub fn envelope_records(json: &Value) -> Result<&[Value], EnvelopeError> {
    let map = json.as_object().ok_or(EnvelopeError::NotAnObject)?;
    match map.get("data") {
        None | Some(Value::Null) => Err(EnvelopeError::MissingData),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(EnvelopeError::NotAList),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Products
// ═══════════════════════════════════════════════════════════════════════

/// Normalize and validate one product record.
///
/// A product must carry a non-empty id, a non-empty name, a boolean
/// `available` and a numeric `price`. Strings that look like numbers or
/// booleans are rejected, not coerced.
pub fn normalize_product(value: &Value) -> Result<Product, Rejection> {
    let record = Record::classify(value).ok_or(Rejection::NotAnObject)?;

    let id = record
        .id()
        .filter(|id| !id.is_empty())
        .ok_or(Rejection::MissingId)?;
    let name = record.str_field("name").ok_or(Rejection::MissingName)?;
    let available = record
        .field("available")
        .and_then(Value::as_bool)
        .ok_or(Rejection::AvailabilityNotBoolean)?;
    let price = record
        .field("price")
        .and_then(Value::as_f64)
        .ok_or(Rejection::PriceNotNumeric)?;

    let images = match record.field("image") {
        Some(media) => normalize_media(Some(media)),
        None => normalize_media(record.field("images")),
    };

    Ok(Product {
        id,
        name,
        description: record.str_field("description"),
        price,
        original_price: record.field("originalPrice").and_then(Value::as_f64),
        available,
        slug: record.str_field("slug"),
        category: category_ref(record.field("category")),
        images,
    })
}

fn category_ref(value: Option<&Value>) -> Option<CategoryRef> {
    let record = Record::classify(relation(value)?)?;
    Some(CategoryRef {
        id: record.id()?,
        name: record.str_field("name"),
        slug: record.str_field("slug"),
    })
}

/// Normalize every product in an envelope, collecting rejections.
pub fn products_from_envelope(json: &Value) -> Result<Normalized<Product>, EnvelopeError> {
    normalize_all(envelope_records(json)?, normalize_product)
}

// ═══════════════════════════════════════════════════════════════════════
// Categories
// ═══════════════════════════════════════════════════════════════════════

/// Normalize one category record. Only the id is required.
pub fn normalize_category(value: &Value) -> Result<Category, Rejection> {
    let record = Record::classify(value).ok_or(Rejection::NotAnObject)?;
    let id = record.id().ok_or(Rejection::MissingId)?;

    Ok(Category {
        id,
        name: record.str_field("name"),
        slug: record.str_field("slug"),
        document_id: record.str_field("documentId"),
        image: normalize_media(record.field("image")).into_iter().next(),
    })
}

pub fn categories_from_envelope(json: &Value) -> Result<Normalized<Category>, EnvelopeError> {
    normalize_all(envelope_records(json)?, normalize_category)
}

fn normalize_all<T>(
    records: &[Value],
    normalize: impl Fn(&Value) -> Result<T, Rejection>,
) -> Result<Normalized<T>, EnvelopeError> {
    let mut items = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for (index, value) in records.iter().enumerate() {
        match normalize(value) {
            Ok(item) => items.push(item),
            Err(reason) => rejected.push(Rejected {
                index,
                id: value.get("id").and_then(parse_id).map(|id| id.to_string()),
                reason,
            }),
        }
    }

    Ok(Normalized {
        items,
        received: records.len(),
        rejected,
    })
}
