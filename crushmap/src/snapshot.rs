/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Wire payloads returned by the management API.
//!
//! Everything the viewer consumes is decoded into these records at the
//! HTTP boundary, so malformed upstream data surfaces as a decode error
//! instead of somewhere deep in tree construction. Paths that are
//! simply missing (an `osd_map` without a `tree`, say) decode to empty
//! defaults; fields that are present but mistyped do not decode at all.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Type tag that marks a CRUSH hierarchy root.
pub const ROOT_TYPE: &str = "root";

/// One element of the flat CRUSH node listing at
/// `osd_map.tree.nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Unique within a snapshot. Buckets are negative, OSDs are not.
    pub id: i64,
    /// Type tag (`root`, `host`, `osd`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name.
    pub name: String,
    /// Status string; OSDs report `up`/`down`, buckets usually omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Ids of this node's children, in upstream order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<i64>>,
    /// Every other field of the record, kept verbatim for the detail
    /// pane (`crush_weight`, `device_class`, `reweight`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawNode {
    /// `"<name> (<type>)"`, shared by tree labels and detail titles.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }

    /// Declared child ids, treating an empty list like an absent one.
    pub fn child_ids(&self) -> Option<&[i64]> {
        match &self.children {
            Some(ids) if !ids.is_empty() => Some(ids),
            _ => None,
        }
    }
}

/// `GET /api/health/full`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FullHealth {
    #[serde(default)]
    pub osd_map: OsdMap,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OsdMap {
    #[serde(default)]
    pub tree: OsdTree,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OsdTree {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
}

impl FullHealth {
    /// The flat node listing; empty when the snapshot lacks it.
    pub fn nodes(&self) -> &[RawNode] {
        &self.osd_map.tree.nodes
    }
}

/// `GET /api/health/minimal`. Only the overall status is interpreted;
/// the rest is carried along for display.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MinimalHealth {
    #[serde(default)]
    pub health: HealthStatus,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HealthStatus {
    /// `HEALTH_OK`, `HEALTH_WARN` or `HEALTH_ERR`.
    #[serde(default)]
    pub status: String,
}

impl MinimalHealth {
    pub fn is_ok(&self) -> bool {
        self.health.status == "HEALTH_OK"
    }
}

/// `GET /api/summary`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub rbd_mirroring: Option<RbdMirroring>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RbdMirroring {
    #[serde(default)]
    pub errors: u64,
    #[serde(default)]
    pub warnings: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn raw_node_keeps_unknown_fields() {
        let node: RawNode = serde_json::from_value(json!({
            "id": 3,
            "type": "osd",
            "name": "osd.3",
            "status": "up",
            "crush_weight": 0.5,
            "device_class": "ssd",
        }))
        .unwrap();
        assert_eq!(node.kind, "osd");
        assert_eq!(node.children, None);
        assert_eq!(node.extra["device_class"], json!("ssd"));
        assert_eq!(node.extra.len(), 2);
    }

    #[test]
    fn label_is_name_and_type() {
        let node: RawNode =
            serde_json::from_value(json!({"id": 0, "type": "osd", "name": "osd.0"})).unwrap();
        assert_eq!(node.label(), "osd.0 (osd)");
    }

    #[test]
    fn empty_children_list_counts_as_leaf() {
        let node: RawNode = serde_json::from_value(
            json!({"id": -2, "type": "host", "name": "node-a", "children": []}),
        )
        .unwrap();
        assert_eq!(node.children, Some(vec![]));
        assert!(node.child_ids().is_none());
    }

    #[test]
    fn missing_node_path_decodes_as_empty() {
        let health: FullHealth = serde_json::from_value(json!({"osd_map": {}})).unwrap();
        assert!(health.nodes().is_empty());
        let health: FullHealth = serde_json::from_value(json!({"mgr_map": {}})).unwrap();
        assert!(health.nodes().is_empty());
    }

    #[test]
    fn mistyped_node_is_rejected() {
        let result: Result<FullHealth, _> = serde_json::from_value(json!({
            "osd_map": {"tree": {"nodes": [{"id": "not-a-number", "type": "osd", "name": "x"}]}}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn minimal_health_status() {
        let health: MinimalHealth = serde_json::from_value(json!({
            "health": {"status": "HEALTH_WARN"},
            "mon_status": {"quorum": [0, 1]},
        }))
        .unwrap();
        assert!(!health.is_ok());
        assert!(health.rest.contains_key("mon_status"));
    }
}
