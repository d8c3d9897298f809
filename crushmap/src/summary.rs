/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::snapshot::Summary;

/// Highlight for the block-storage entry of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthColor {
    Error,
    Warning,
}

impl HealthColor {
    /// CSS-style hex color.
    pub fn hex(&self) -> &'static str {
        match self {
            HealthColor::Error => "#d9534f",
            HealthColor::Warning => "#f0ad4e",
        }
    }

    /// The color as an RGB triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            HealthColor::Error => (0xd9, 0x53, 0x4f),
            HealthColor::Warning => (0xf0, 0xad, 0x4e),
        }
    }
}

/// Color for the block-storage entry, driven by RBD mirroring
/// counters. Errors take precedence over warnings; no summary or a
/// clean summary yields no highlight.
pub fn block_health_color(summary: Option<&Summary>) -> Option<HealthColor> {
    let mirroring = summary?.rbd_mirroring?;
    if mirroring.errors > 0 {
        Some(HealthColor::Error)
    } else if mirroring.warnings > 0 {
        Some(HealthColor::Warning)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn summary(value: serde_json::Value) -> Summary {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn errors_beat_warnings() {
        let s = summary(json!({"rbd_mirroring": {"errors": 1, "warnings": 3}}));
        assert_eq!(block_health_color(Some(&s)), Some(HealthColor::Error));
        assert_eq!(HealthColor::Error.hex(), "#d9534f");
    }

    #[test]
    fn warnings_only() {
        let s = summary(json!({"rbd_mirroring": {"errors": 0, "warnings": 2}}));
        assert_eq!(block_health_color(Some(&s)), Some(HealthColor::Warning));
    }

    #[test]
    fn clean_or_missing_summary_has_no_color() {
        let clean = summary(json!({"rbd_mirroring": {"errors": 0, "warnings": 0}}));
        assert_eq!(block_health_color(Some(&clean)), None);
        let absent = summary(json!({"executing_tasks": []}));
        assert_eq!(block_health_color(Some(&absent)), None);
        assert_eq!(block_health_color(None), None);
    }
}
