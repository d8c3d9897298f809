/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::HashSet;

use crushmap::DisplayNode;

use crate::model::FlatRow;

/// Generic tree fold. `f` receives the node, its depth and the
/// results of its children.
pub(crate) fn fold_tree_with_depth<'a, B, F>(node: &'a DisplayNode, depth: usize, f: &F) -> B
where
    F: Fn(&'a DisplayNode, usize, Vec<B>) -> B,
{
    let child_results: Vec<B> = node
        .child_nodes()
        .iter()
        .map(|child| fold_tree_with_depth(child, depth + 1, f))
        .collect();
    f(node, depth, child_results)
}

/// Flatten a forest into visible rows.
///
/// A node is expanded unless its source id is in `collapsed`; only
/// expanded nodes contribute their children.
pub(crate) fn flatten_forest<'a>(
    roots: &'a [DisplayNode],
    collapsed: &HashSet<i64>,
) -> Vec<FlatRow<'a>> {
    roots
        .iter()
        .flat_map(|root| flatten_visible(root, 0, collapsed))
        .collect()
}

pub(crate) fn flatten_visible<'a>(
    node: &'a DisplayNode,
    depth: usize,
    collapsed: &HashSet<i64>,
) -> Vec<FlatRow<'a>> {
    fold_tree_with_depth(node, depth, &|n, d, child_results| {
        let expanded = n.has_children() && !is_collapsed(n, collapsed);
        let mut rows = vec![FlatRow {
            node: n,
            depth: d,
            expanded,
        }];
        if expanded {
            rows.extend(child_results.into_iter().flatten());
        }
        rows
    })
}

fn is_collapsed(node: &DisplayNode, collapsed: &HashSet<i64>) -> bool {
    node.source_id.is_some_and(|id| collapsed.contains(&id))
}

/// Source ids of every node that has children, visible or not.
pub(crate) fn collect_parent_ids(roots: &[DisplayNode]) -> HashSet<i64> {
    roots
        .iter()
        .flat_map(|root| {
            fold_tree_with_depth(root, 0, &|n, _, child_results: Vec<HashSet<i64>>| {
                let mut ids: HashSet<i64> = child_results.into_iter().flatten().collect();
                if n.has_children() {
                    ids.extend(n.source_id);
                }
                ids
            })
        })
        .collect()
}

/// Total number of rows when everything is expanded.
#[cfg(test)]
pub(crate) fn count_nodes(roots: &[DisplayNode]) -> usize {
    roots
        .iter()
        .map(|root| fold_tree_with_depth(root, 0, &|_, _, c: Vec<usize>| 1 + c.iter().sum::<usize>()))
        .sum()
}
