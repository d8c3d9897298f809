/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crushmap::DisplayNode;

/// Navigation cursor over a bounded list.
///
/// Invariant: `pos < len` (or `pos == 0` when `len == 0`).
/// Movement methods return `true` when the position changes.
#[derive(Debug, Clone)]
pub(crate) struct Cursor {
    pos: usize,
    len: usize,
}

impl Cursor {
    pub(crate) fn new(len: usize) -> Self {
        Self { pos: 0, len }
    }

    pub(crate) fn move_up(&mut self) -> bool {
        self.set_checked(self.pos.saturating_sub(1))
    }

    pub(crate) fn move_down(&mut self) -> bool {
        if self.pos + 1 < self.len {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn home(&mut self) -> bool {
        self.set_checked(0)
    }

    pub(crate) fn end(&mut self) -> bool {
        self.set_checked(self.len.saturating_sub(1))
    }

    pub(crate) fn page_down(&mut self, amount: usize) -> bool {
        self.set_checked((self.pos + amount).min(self.len.saturating_sub(1)))
    }

    pub(crate) fn page_up(&mut self, amount: usize) -> bool {
        self.set_checked(self.pos.saturating_sub(amount))
    }

    /// Update length and clamp position to remain valid. Called after
    /// every forest swap and collapse.
    pub(crate) fn update_len(&mut self, new_len: usize) {
        self.len = new_len;
        self.pos = self.pos.min(new_len.saturating_sub(1));
    }

    /// Set position directly, clamped to the valid range.
    pub(crate) fn set_pos(&mut self, new_pos: usize) {
        self.pos = new_pos.min(self.len.saturating_sub(1));
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    fn set_checked(&mut self, new_pos: usize) -> bool {
        if self.pos != new_pos {
            self.pos = new_pos;
            true
        } else {
            false
        }
    }
}

/// A single row in the flattened view.
#[derive(Debug, Clone)]
pub(crate) struct FlatRow<'a> {
    pub(crate) node: &'a DisplayNode,
    pub(crate) depth: usize,
    /// Children are shown below this row.
    pub(crate) expanded: bool,
}

/// Flattened visible rows with cursor helpers.
#[derive(Debug)]
pub(crate) struct VisibleRows<'a> {
    rows: Vec<FlatRow<'a>>,
}

impl<'a> VisibleRows<'a> {
    pub(crate) fn new(rows: Vec<FlatRow<'a>>) -> Self {
        Self { rows }
    }

    pub(crate) fn get(&self, cursor: &Cursor) -> Option<&FlatRow<'a>> {
        self.rows.get(cursor.pos())
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn as_slice(&self) -> &[FlatRow<'a>] {
        &self.rows
    }

    /// Position of the row showing `source_id`.
    pub(crate) fn position_of(&self, source_id: Option<i64>) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.node.source_id == source_id)
    }

    /// Whether a later row at the same depth exists (`├─` vs `└─`).
    pub(crate) fn has_sibling_after(&self, idx: usize, depth: usize) -> bool {
        for row in &self.rows[idx + 1..] {
            if row.depth < depth {
                return false;
            }
            if row.depth == depth {
                return true;
            }
        }
        false
    }
}
