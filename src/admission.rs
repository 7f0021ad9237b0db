//! Record admission: defaults, escaping and untyped intake.
//!
//! Admission never fails. Missing or mistyped fields fall back to their
//! defaults so a partially broken feed still yields a document.
//!
//! ## What gets escaped
//!
//! With escaping enabled, [`normalize`] escapes:
//!
//! - `loc`
//! - every value of every `images` map
//! - `lang` and `loc` of every translation and alternate
//! - `title` and `description` of each video, when non-empty
//! - `googlenews.sitename`, when supplied
//!
//! The record `title`, `lastmod`, `priority`, `freq` and the remaining video
//! and news fields are stored as given.

use crate::escape::escape_xml;
use crate::types::{Alternate, Fields, GoogleNews, Item, ItemInput, ItemParams};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Timestamp layout used for a defaulted `googlenews.publication_date`.
pub const PUBLICATION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize one record descriptor into a stored [`Item`].
pub fn normalize(params: ItemParams, escaping: bool, now: DateTime<Utc>) -> Item {
    let ItemParams {
        loc,
        lastmod,
        priority,
        freq,
        title,
        mut images,
        mut translations,
        mut alternates,
        mut videos,
        mut googlenews,
    } = params;

    let mut loc = loc.unwrap_or_else(|| "/".to_string());

    if escaping {
        loc = escape_owned(loc);
        for image in &mut images {
            for value in image.values_mut() {
                *value = escape_owned(std::mem::take(value));
            }
        }
        for alt in translations.iter_mut().chain(alternates.iter_mut()) {
            alt.lang = escape_owned(std::mem::take(&mut alt.lang));
            alt.loc = escape_owned(std::mem::take(&mut alt.loc));
        }
        for video in &mut videos {
            for key in ["title", "description"] {
                if let Some(value) = video.get_mut(key)
                    && !value.is_empty()
                {
                    *value = escape_owned(std::mem::take(value));
                }
            }
        }
        if let Some(sitename) = googlenews.get_mut("sitename") {
            *sitename = escape_owned(std::mem::take(sitename));
        }
    }

    let sitename = googlenews.remove("sitename").unwrap_or_default();
    let language = googlenews
        .remove("language")
        .unwrap_or_else(|| "en".to_string());
    let publication_date = googlenews
        .remove("publication_date")
        .unwrap_or_else(|| now.format(PUBLICATION_DATE_FORMAT).to_string());

    Item {
        loc,
        lastmod,
        priority,
        freq,
        title,
        images,
        translations,
        alternates,
        videos,
        googlenews: GoogleNews {
            sitename,
            language,
            publication_date,
            extra: googlenews,
        },
    }
}

fn escape_owned(value: String) -> String {
    match escape_xml(&value) {
        std::borrow::Cow::Borrowed(_) => value,
        std::borrow::Cow::Owned(escaped) => escaped,
    }
}

/// Interpret an untyped JSON value as admission input.
///
/// An array of two or more entries is a batch. Anything else is a single
/// descriptor; a one-element array is read as its only element, and a
/// non-object value yields an all-defaults record.
pub fn input_from_value(value: &Value) -> ItemInput {
    match value {
        Value::Array(entries) if entries.len() > 1 => {
            ItemInput::Batch(entries.iter().map(params_from_value).collect())
        }
        Value::Array(entries) => ItemInput::Single(
            entries
                .first()
                .map(params_from_value)
                .unwrap_or_default(),
        ),
        other => ItemInput::Single(params_from_value(other)),
    }
}

/// Read one record descriptor from a JSON value, leniently.
pub fn params_from_value(value: &Value) -> ItemParams {
    let Some(obj) = value.as_object() else {
        return ItemParams::default();
    };

    ItemParams {
        // `loc` must be a real string; anything else falls back to "/".
        loc: obj.get("loc").and_then(Value::as_str).map(str::to_string),
        lastmod: obj.get("lastmod").and_then(scalar_string),
        priority: obj.get("priority").and_then(scalar_string),
        freq: obj.get("freq").and_then(scalar_string),
        title: obj.get("title").and_then(scalar_string),
        images: list_of_fields(obj.get("images")),
        translations: list_of_alternates(obj.get("translations")),
        alternates: list_of_alternates(obj.get("alternates")),
        videos: list_of_fields(obj.get("videos")),
        googlenews: obj
            .get("googlenews")
            .and_then(Value::as_object)
            .map(fields_from_object)
            .unwrap_or_default(),
    }
}

/// Strings pass through; numbers and booleans are stringified.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn fields_from_object(obj: &Map<String, Value>) -> Fields {
    obj.iter()
        .filter_map(|(k, v)| scalar_string(v).map(|s| (k.clone(), s)))
        .collect()
}

fn list_of_fields(value: Option<&Value>) -> Vec<Fields> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(fields_from_object)
                .collect()
        })
        .unwrap_or_default()
}

fn list_of_alternates(value: Option<&Value>) -> Vec<Alternate> {
    list_of_fields(value)
        .into_iter()
        .map(|mut f| Alternate {
            lang: f.remove("lang").unwrap_or_default(),
            loc: f.remove("loc").unwrap_or_default(),
        })
        .collect()
}
