/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Node metadata for the detail pane.
//!
//! [`MetadataIndex`] maps a display node's `source_id` back to the raw
//! record it came from. It is rebuilt from scratch for each snapshot
//! and replaces the previous one wholesale; nothing is merged across
//! snapshots.
//!
//! [`SelectionState`] owns the user's current selection. Selection is
//! cleared only by an explicit deselect (or selecting the sentinel),
//! never by a refresh.

use std::collections::HashMap;

use serde_json::Map;
use serde_json::Value;

use crate::snapshot::RawNode;
use crate::topology::TopologyError;

/// Id-keyed view of one snapshot's raw nodes.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    nodes: HashMap<i64, RawNode>,
}

/// What the detail pane shows for a selected node.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// `"<name> (<type>)"`.
    pub title: String,
    /// The raw record minus `name`, `type` and `status`.
    pub detail: Map<String, Value>,
}

impl MetadataIndex {
    /// Index `nodes` by id, rejecting repeated ids.
    pub fn from_nodes(nodes: &[RawNode]) -> Result<Self, TopologyError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if index.insert(node.id, node.clone()).is_some() {
                return Err(TopologyError::DuplicateId(node.id));
            }
        }
        Ok(Self { nodes: index })
    }

    pub fn get(&self, id: i64) -> Option<&RawNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a click on a display node.
    ///
    /// Returns `None` for the sentinel (no `source_id`), for an
    /// explicit deselection, and for ids this snapshot does not know.
    /// Callers clear the detail pane on `None`.
    pub fn on_select(&self, source_id: Option<i64>) -> Option<Selection> {
        let node = self.get(source_id?)?;
        Some(Selection {
            title: node.label(),
            detail: detail_fields(node),
        })
    }
}

/// The raw record as a JSON object without `name`, `type` and
/// `status`.
fn detail_fields(node: &RawNode) -> Map<String, Value> {
    let mut detail = node.extra.clone();
    detail.insert("id".to_string(), Value::from(node.id));
    if let Some(children) = &node.children {
        detail.insert("children".to_string(), Value::from(children.clone()));
    }
    detail
}

/// The user's selection and the detail last shown for it.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Option<i64>,
    shown: Option<Selection>,
}

impl SelectionState {
    /// Select `source_id` (or deselect with `None`) against `index`.
    pub fn select(&mut self, index: &MetadataIndex, source_id: Option<i64>) {
        self.selected = source_id;
        self.shown = index.on_select(source_id);
        if source_id.is_some() && self.shown.is_none() {
            tracing::debug!(?source_id, "selected node has no metadata");
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.shown = None;
    }

    /// Re-resolve the current selection against a fresh snapshot.
    ///
    /// If the selected node is gone from `index`, the previous detail
    /// stays on display.
    pub fn refresh(&mut self, index: &MetadataIndex) {
        if let Some(selection) = index.on_select(self.selected) {
            self.shown = Some(selection);
        }
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn shown(&self) -> Option<&Selection> {
        self.shown.as_ref()
    }
}
