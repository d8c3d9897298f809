/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Reconstruction of the CRUSH hierarchy from a flat node listing.
//!
//! The snapshot lists every bucket and device once, with parent→child
//! links given as id references. [`build_forest`] turns that listing
//! into one display tree per `root` bucket.
//!
//! Construction is two-pass: every node is first indexed by id (which
//! also becomes the [`MetadataIndex`] for the detail pane), then each
//! root is expanded top-down through the index. This does not depend on
//! the upstream listing order, so children may appear before or after
//! their parents.
//!
//! Invariants:
//! - **Unique ids**: a repeated id is rejected
//!   ([`TopologyError::DuplicateId`]).
//! - **Closed references**: every child id must name a node in the same
//!   snapshot ([`TopologyError::DanglingChild`]).
//! - **Acyclic**: a node that appears in its own ancestor path is
//!   rejected ([`TopologyError::Cycle`]).
//! - **Forest**: every node is placed at most once. A node listed under
//!   a second parent, or a root listed as a child, is rejected
//!   ([`TopologyError::SharedChild`]). The display size is therefore
//!   bounded by the listing size.
//! - **Bounded depth**: trees deeper than [`MAX_DEPTH`] are rejected
//!   ([`TopologyError::TooDeep`]).
//! - **Child order**: children are sorted by ascending id regardless of
//!   upstream order.
//! - **Root order**: roots are returned in reverse listing order.
//! - **Leaves have no child list**: `children` is `None` unless the raw
//!   node declared at least one child.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::metadata::MetadataIndex;
use crate::snapshot::RawNode;
use crate::snapshot::ROOT_TYPE;

/// Label of the placeholder shown when a snapshot has no nodes.
pub const NO_NODES_LABEL: &str = "No nodes!";

/// Deepest tree accepted, counting the root as depth 1. Real CRUSH
/// maps rarely exceed six levels.
pub const MAX_DEPTH: usize = 64;

/// Structural defects in a snapshot's node listing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("duplicate node id {0} in snapshot")]
    DuplicateId(i64),
    #[error("node {parent} references missing child {child}")]
    DanglingChild { parent: i64, child: i64 },
    #[error("node {0} is its own ancestor")]
    Cycle(i64),
    /// `first` is the parent the node was first placed under, or the
    /// node itself when it is a root.
    #[error("node {id} is listed under both {first} and {second}")]
    SharedChild { id: i64, first: i64, second: i64 },
    #[error("node {0} is nested deeper than {max} levels", max = MAX_DEPTH)]
    TooDeep(i64),
}

/// Render-ready projection of a [`RawNode`] plus its resolved
/// children.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayNode {
    /// `"<name> (<type>)"`, or [`NO_NODES_LABEL`] for the sentinel.
    pub label: String,
    pub status: Option<String>,
    /// Back-reference into the [`MetadataIndex`]. `None` only for the
    /// sentinel.
    pub source_id: Option<i64>,
    /// Raw type tag. `None` only for the sentinel.
    pub kind: Option<String>,
    /// `None` for leaves; never `Some` of an empty list.
    pub children: Option<Vec<DisplayNode>>,
}

impl DisplayNode {
    /// The synthetic "no data" placeholder.
    pub fn sentinel() -> Self {
        Self {
            label: NO_NODES_LABEL.to_string(),
            status: None,
            source_id: None,
            kind: None,
            children: None,
        }
    }

    fn from_raw(node: &RawNode, children: Option<Vec<DisplayNode>>) -> Self {
        Self {
            label: node.label(),
            status: node.status.clone(),
            source_id: Some(node.id),
            kind: Some(node.kind.clone()),
            children,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.source_id.is_none()
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// Child nodes, empty for leaves.
    pub fn child_nodes(&self) -> &[DisplayNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// Result of one snapshot: the display trees and the id index they
/// were resolved through.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub roots: Vec<DisplayNode>,
    pub index: MetadataIndex,
}

/// Build the display forest for a snapshot's flat node listing.
///
/// An empty listing yields a single sentinel node and an empty index.
/// A non-empty listing without any `root` bucket yields no roots.
pub fn build_forest(nodes: &[RawNode]) -> Result<Forest, TopologyError> {
    if nodes.is_empty() {
        return Ok(Forest {
            roots: vec![DisplayNode::sentinel()],
            index: MetadataIndex::default(),
        });
    }

    let index = MetadataIndex::from_nodes(nodes)?;
    let mut builder = Builder {
        index: &index,
        path: HashSet::new(),
        placed: nodes
            .iter()
            .filter(|node| node.kind == ROOT_TYPE)
            .map(|node| (node.id, node.id))
            .collect(),
    };
    let roots = nodes
        .iter()
        .rev()
        .filter(|node| node.kind == ROOT_TYPE)
        .map(|node| builder.build(node))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        nodes = nodes.len(),
        roots = roots.len(),
        "built crush forest"
    );
    Ok(Forest { roots, index })
}

/// Top-down expansion state for one snapshot.
struct Builder<'a> {
    index: &'a MetadataIndex,
    /// Ids from the current root down to (but excluding) the node
    /// being built.
    path: HashSet<i64>,
    /// Node id to the parent it was placed under. Roots map to
    /// themselves.
    placed: HashMap<i64, i64>,
}

impl<'a> Builder<'a> {
    /// Expand `node` and its descendants. `path` is restored before
    /// returning.
    fn build(&mut self, node: &RawNode) -> Result<DisplayNode, TopologyError> {
        if self.path.len() >= MAX_DEPTH {
            return Err(TopologyError::TooDeep(node.id));
        }
        self.path.insert(node.id);

        let children = match node.child_ids() {
            Some(ids) => {
                let mut sorted = ids.to_vec();
                sorted.sort_unstable();
                let mut built = Vec::with_capacity(sorted.len());
                for child_id in sorted {
                    let child = self.place(node.id, child_id)?;
                    built.push(self.build(child)?);
                }
                Some(built)
            }
            None => None,
        };

        self.path.remove(&node.id);
        Ok(DisplayNode::from_raw(node, children))
    }

    /// Resolve `child` under `parent`, claiming it for that parent.
    fn place(&mut self, parent: i64, child: i64) -> Result<&'a RawNode, TopologyError> {
        if self.path.contains(&child) {
            return Err(TopologyError::Cycle(child));
        }
        let index: &'a MetadataIndex = self.index;
        let raw = index
            .get(child)
            .ok_or(TopologyError::DanglingChild { parent, child })?;
        if let Some(&first) = self.placed.get(&child) {
            return Err(TopologyError::SharedChild {
                id: child,
                first,
                second: parent,
            });
        }
        self.placed.insert(child, parent);
        Ok(raw)
    }
}
