//! Source index linearization.
//!
//! The index template walks a flat list of markers instead of a nested
//! structure, so the grouping is decided here:
//!
//! ```text
//! start-category "GitHub"
//!   start-list
//!     link 2017-10-27-13:16:35
//!     link latest
//!   end-list
//! end-category
//! start-category "Slack"
//!   ...
//! ```
//!
//! Categories follow discovery order. A category name that appears for two
//! directories is one group (all of its snapshots) replayed at each
//! occurrence; back-to-back occurrences share a single `start-category`.
//! Links are sorted by `name` as plain strings, which is chronological only
//! because snapshot stems are zero-padded timestamps.

use crate::snapshot::SnapshotDescriptor;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::HashMap;

/// One marker of the index stream.
///
/// Serialized as `{ "type": "<kebab-case tag>", "content": <payload> }`.
/// Markers without a payload carry `"content": null`, so templates can test
/// `element.content is none`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderElement<'a> {
    StartCategory(&'a str),
    EndCategory,
    StartList,
    EndList,
    Link(&'a SnapshotDescriptor),
}

impl RenderElement<'_> {
    pub fn tag(&self) -> &'static str {
        match self {
            RenderElement::StartCategory(_) => "start-category",
            RenderElement::EndCategory => "end-category",
            RenderElement::StartList => "start-list",
            RenderElement::EndList => "end-list",
            RenderElement::Link(_) => "link",
        }
    }
}

impl Serialize for RenderElement<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut element = serializer.serialize_struct("RenderElement", 2)?;
        element.serialize_field("type", self.tag())?;
        match self {
            RenderElement::StartCategory(name) => element.serialize_field("content", name)?,
            RenderElement::Link(snapshot) => element.serialize_field("content", snapshot)?,
            _ => element.serialize_field("content", &Option::<()>::None)?,
        }
        element.end()
    }
}

/// Group `snapshots` by category and flatten them in `categories` order.
pub fn build_elements<'a>(
    categories: &'a [String],
    snapshots: &[&'a SnapshotDescriptor],
) -> Vec<RenderElement<'a>> {
    let mut groups: HashMap<&str, Vec<&'a SnapshotDescriptor>> = HashMap::new();
    for snapshot in snapshots {
        groups
            .entry(snapshot.category.as_str())
            .or_default()
            .push(*snapshot);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let mut elements = Vec::new();
    let mut current: Option<&str> = None;
    for category in categories {
        if current != Some(category.as_str()) {
            if current.is_some() {
                elements.push(RenderElement::EndCategory);
            }
            elements.push(RenderElement::StartCategory(category.as_str()));
            current = Some(category.as_str());
        }
        elements.push(RenderElement::StartList);
        if let Some(group) = groups.get(category.as_str()) {
            elements.extend(group.iter().copied().map(RenderElement::Link));
        }
        elements.push(RenderElement::EndList);
    }
    if current.is_some() {
        elements.push(RenderElement::EndCategory);
    }
    elements
}
