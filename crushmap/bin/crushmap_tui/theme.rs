/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use clap::ValueEnum;
use crushmap::summary::HealthColor;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Selectable color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ThemeName {
    /// Nord, an arctic, north-bluish color palette.
    #[default]
    Nord,
    /// doom-nord-light, desaturated Nord accents for light backgrounds.
    DoomNordLight,
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeName::Nord => write!(f, "nord"),
            ThemeName::DoomNordLight => write!(f, "doom-nord-light"),
        }
    }
}

/// All user-visible text in the TUI.
pub(crate) struct Labels {
    pub(crate) app_name: &'static str,

    pub(crate) separator: &'static str,
    pub(crate) selection_caret: &'static str,
    pub(crate) selected_mark: &'static str,
    pub(crate) refresh_icon: &'static str,
    pub(crate) no_selection: &'static str,
    pub(crate) loading: &'static str,

    pub(crate) nodes: &'static str,
    pub(crate) health: &'static str,
    pub(crate) block: &'static str,
    pub(crate) notifications: &'static str,

    pub(crate) pane_topology: &'static str,
    pub(crate) pane_details: &'static str,
    pub(crate) select_hint: &'static str,

    pub(crate) footer_help_text: &'static str,
}

impl Labels {
    pub(crate) fn en() -> Self {
        Self {
            app_name: "crushmap",
            separator: " • ",
            selection_caret: "▸ ",
            selected_mark: "● ",
            refresh_icon: "⟳ ",
            no_selection: "No selection",
            loading: "loading",
            nodes: "nodes: ",
            health: "health: ",
            block: "rbd",
            notifications: "alerts: ",
            pane_topology: "CRUSH map",
            pane_details: "Details",
            select_hint: "Press Enter on a node to view its metadata",
            footer_help_text: "q: quit | j/k: navigate | g/G: top/bottom | Enter: select | Esc: deselect | Tab: expand/collapse | c/e: collapse/expand all",
        }
    }
}

/// Semantic color roles. Themes assign concrete colors to the roles.
pub(crate) struct ColorScheme {
    // UI chrome
    pub(crate) app_name: Style,
    pub(crate) border: Style,
    pub(crate) footer_help: Style,

    // Node kinds
    pub(crate) node_root: Style,
    pub(crate) node_bucket: Style,
    pub(crate) node_device: Style,
    pub(crate) node_placeholder: Style,

    // Device status
    pub(crate) status_up: Style,
    pub(crate) status_down: Style,

    pub(crate) error: Style,
    pub(crate) info: Style,

    // Header stats
    pub(crate) stat_timing: Style,
    pub(crate) stat_selection: Style,
    pub(crate) stat_url: Style,
    pub(crate) stat_label: Style,
    pub(crate) health_ok: Style,
    pub(crate) health_warn: Style,

    // Detail pane
    pub(crate) detail_label: Style,
    pub(crate) detail_value: Style,
}

impl ColorScheme {
    /// Nord color scheme (https://www.nordtheme.com/).
    pub(crate) fn nord() -> Self {
        let polar3 = Color::Rgb(76, 86, 106); // #4C566A
        let snow0 = Color::Rgb(216, 222, 233); // #D8DEE9
        let snow2 = Color::Rgb(236, 239, 244); // #ECEFF4
        let frost_teal = Color::Rgb(143, 188, 187); // #8FBCBB
        let frost_cyan = Color::Rgb(136, 192, 208); // #88C0D0
        let frost_blue = Color::Rgb(129, 161, 193); // #81A1C1
        let aurora_red = Color::Rgb(191, 97, 106); // #BF616A
        let aurora_orange = Color::Rgb(208, 135, 112); // #D08770
        let aurora_yellow = Color::Rgb(235, 203, 139); // #EBCB8B
        let aurora_green = Color::Rgb(163, 190, 140); // #A3BE8C
        let aurora_purple = Color::Rgb(180, 142, 173); // #B48EAD

        Self {
            app_name: Style::default().fg(frost_cyan).add_modifier(Modifier::BOLD),
            border: Style::default().fg(polar3),
            footer_help: Style::default().fg(polar3),

            node_root: Style::default().fg(frost_teal),
            node_bucket: Style::default().fg(aurora_yellow),
            node_device: Style::default().fg(frost_blue),
            node_placeholder: Style::default().fg(polar3),

            status_up: Style::default().fg(aurora_green),
            status_down: Style::default().fg(aurora_red).add_modifier(Modifier::BOLD),

            error: Style::default().fg(aurora_red),
            info: Style::default().fg(frost_cyan),

            stat_timing: Style::default().fg(aurora_yellow),
            stat_selection: Style::default().fg(aurora_purple),
            stat_url: Style::default().fg(polar3),
            stat_label: Style::default().fg(snow0),
            health_ok: Style::default().fg(aurora_green),
            health_warn: Style::default().fg(aurora_orange),

            detail_label: Style::default().fg(snow0),
            detail_value: Style::default().fg(snow2),
        }
    }

    /// doom-nord-light color scheme.
    pub(crate) fn doom_nord_light() -> Self {
        let base7 = Color::Rgb(96, 114, 140); // #60728C
        let fg = Color::Rgb(59, 66, 82); // #3B4252
        let fg_alt = Color::Rgb(46, 52, 64); // #2E3440
        let red = Color::Rgb(153, 50, 75); // #99324B
        let orange = Color::Rgb(172, 68, 38); // #AC4426
        let green = Color::Rgb(79, 137, 76); // #4F894C
        let yellow = Color::Rgb(154, 117, 0); // #9A7500
        let blue = Color::Rgb(59, 110, 168); // #3B6EA8
        let teal = Color::Rgb(41, 131, 141); // #29838D
        let cyan = Color::Rgb(57, 142, 172); // #398EAC
        let violet = Color::Rgb(132, 40, 121); // #842879

        Self {
            app_name: Style::default().fg(teal).add_modifier(Modifier::BOLD),
            border: Style::default().fg(base7),
            footer_help: Style::default().fg(base7),

            node_root: Style::default().fg(teal),
            node_bucket: Style::default().fg(yellow),
            node_device: Style::default().fg(blue),
            node_placeholder: Style::default().fg(base7),

            status_up: Style::default().fg(green),
            status_down: Style::default().fg(red).add_modifier(Modifier::BOLD),

            error: Style::default().fg(red),
            info: Style::default().fg(cyan),

            stat_timing: Style::default().fg(yellow),
            stat_selection: Style::default().fg(violet),
            stat_url: Style::default().fg(base7),
            stat_label: Style::default().fg(fg),
            health_ok: Style::default().fg(green),
            health_warn: Style::default().fg(orange),

            detail_label: Style::default().fg(fg),
            detail_value: Style::default().fg(fg_alt),
        }
    }

    /// Style for a tree row by raw CRUSH type. Devices are `osd`;
    /// every other non-root type is a bucket.
    pub(crate) fn node_style(&self, kind: Option<&str>) -> Style {
        match kind {
            None => self.node_placeholder,
            Some("root") => self.node_root,
            Some("osd") => self.node_device,
            Some(_) => self.node_bucket,
        }
    }

    /// Style for a device status tag.
    pub(crate) fn status_style(&self, status: &str) -> Style {
        match status {
            "up" => self.status_up,
            "down" | "destroyed" => self.status_down,
            _ => self.info,
        }
    }

    /// Alert count style keyed by the notification badge class
    /// (`top-notification-<n>`).
    pub(crate) fn badge_style(&self, class: &str) -> Style {
        match class.strip_prefix("top-notification-") {
            Some("0") => self.stat_label,
            Some("1") => self.health_warn,
            _ => self.error.add_modifier(Modifier::BOLD),
        }
    }

    /// The fixed block-storage indicator colors. Not theme dependent.
    pub(crate) fn block_style(&self, color: Option<HealthColor>) -> Style {
        match color {
            Some(c) => {
                let (r, g, b) = c.rgb();
                Style::default().fg(Color::Rgb(r, g, b)).add_modifier(Modifier::BOLD)
            }
            None => self.stat_label,
        }
    }
}

/// Colors plus text.
pub(crate) struct Theme {
    pub(crate) scheme: ColorScheme,
    pub(crate) labels: Labels,
}

impl Theme {
    pub(crate) fn new(theme_name: ThemeName) -> Self {
        let scheme = match theme_name {
            ThemeName::Nord => ColorScheme::nord(),
            ThemeName::DoomNordLight => ColorScheme::doom_nord_light(),
        };
        Self {
            scheme,
            labels: Labels::en(),
        }
    }
}
