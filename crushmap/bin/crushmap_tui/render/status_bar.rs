/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crushmap::FetchState;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::theme::ThemeName;

/// Render the navigation bar.
///
/// Line 1: app name • URL • node count • health • rbd indicator •
/// alerts • refresh interval. Line 2: the topology error if the last
/// refresh failed, otherwise the selection and active notification
/// names.
pub(crate) fn render_header(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let l = &app.theme.labels;
    let scheme = &app.theme.scheme;

    let mut line1 = vec![
        Span::styled(l.app_name, scheme.app_name),
        Span::styled(l.separator, scheme.stat_label),
        Span::styled(app.base_url.as_str(), scheme.stat_url),
    ];

    line1.extend([
        Span::styled(l.separator, scheme.stat_label),
        Span::styled(l.nodes, scheme.stat_label),
        Span::styled(
            app.node_count()
                .map_or_else(|| l.loading.to_string(), |n| n.to_string()),
            scheme.stat_selection,
        ),
    ]);

    let (health_text, health_style) = match &app.health {
        FetchState::Ready { value, .. } if value.is_ok() => {
            (value.health.status.clone(), scheme.health_ok)
        }
        FetchState::Ready { value, .. } => (value.health.status.clone(), scheme.health_warn),
        FetchState::Error { .. } => ("unreachable".to_string(), scheme.error),
        FetchState::Unknown => (l.loading.to_string(), scheme.info),
    };
    line1.extend([
        Span::styled(l.separator, scheme.stat_label),
        Span::styled(l.health, scheme.stat_label),
        Span::styled(health_text, health_style),
    ]);

    line1.extend([
        Span::styled(l.separator, scheme.stat_label),
        Span::styled(l.block, scheme.block_style(app.block_color())),
    ]);

    let alert_style = scheme.badge_style(&app.notifications.badge_class());
    line1.extend([
        Span::styled(l.separator, scheme.stat_label),
        Span::styled(l.notifications, scheme.stat_label),
        Span::styled(app.notifications.len().to_string(), alert_style),
    ]);

    if !matches!(app.theme_name, ThemeName::Nord) {
        line1.extend([
            Span::styled(l.separator, scheme.stat_label),
            Span::styled(format!("theme:{}", app.theme_name), scheme.stat_url),
        ]);
    }

    if !app.refresh_interval_label.is_empty() {
        line1.extend([
            Span::styled(l.separator, scheme.stat_label),
            Span::styled(l.refresh_icon, scheme.stat_timing),
            Span::styled(app.refresh_interval_label.as_str(), scheme.stat_timing),
        ]);
    }

    let line2 = match &app.error {
        Some(err) => Line::from(Span::styled(format!("ERROR: {}", err), scheme.error)),
        None => {
            let mut spans = match app.selection.shown() {
                Some(selection) => vec![
                    Span::styled(l.selected_mark, scheme.stat_selection),
                    Span::styled(selection.title.as_str(), scheme.stat_selection),
                ],
                None => vec![Span::styled(l.no_selection, scheme.info)],
            };
            for name in app.notifications.names() {
                spans.push(Span::styled(l.separator, scheme.stat_label));
                spans.push(Span::styled(name.as_str(), scheme.health_warn));
            }
            Line::from(spans)
        }
    };

    let header = Paragraph::new(vec![Line::from(line1), line2]).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(scheme.border),
    );
    frame.render_widget(header, area);
}

/// Render the key binding hints.
pub(crate) fn render_footer(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let footer = Paragraph::new(app.theme.labels.footer_help_text)
        .style(app.theme.scheme.footer_help)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}
