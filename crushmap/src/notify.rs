/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

/// Ordered set of active top-bar notifications.
///
/// Each name is either absent or present. Activating an absent name
/// appends it; deactivating a present name removes it. Both
/// self-transitions are no-ops, so repeated calls with the same
/// `(name, active)` pair change nothing after the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSet {
    names: Vec<String>,
}

impl NotificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show or hide the notification `name`.
    pub fn set_active(&mut self, name: &str, active: bool) {
        if active {
            if !self.contains(name) {
                self.names.push(name.to_string());
            }
        } else if let Some(pos) = self.names.iter().position(|n| n == name) {
            self.names.remove(pos);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Badge count.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Active names in activation order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Layout class for the top bar, e.g. `top-notification-2`.
    pub fn badge_class(&self) -> String {
        format!("top-notification-{}", self.len())
    }
}
