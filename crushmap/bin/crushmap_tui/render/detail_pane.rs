/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crushmap::Selection;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use crate::app::App;
use crate::format::format_field;
use crate::theme::ColorScheme;

/// Render the metadata of the selected node (right pane), or a hint
/// when nothing is selected.
pub(crate) fn render_detail_pane(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let scheme = &app.theme.scheme;
    let (title, lines) = match app.selection.shown() {
        Some(selection) => (selection.title.clone(), detail_lines(selection, scheme)),
        None => (
            app.theme.labels.pane_details.to_string(),
            vec![Line::from(Span::styled(
                app.theme.labels.select_hint,
                scheme.info,
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(scheme.border);
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(p, area);
}

/// One `key: value` line per metadata field, keys aligned.
pub(crate) fn detail_lines<'a>(selection: &'a Selection, scheme: &ColorScheme) -> Vec<Line<'a>> {
    let width = selection.detail.keys().map(String::len).max().unwrap_or(0);
    selection
        .detail
        .iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{:<width$}  ", key, width = width), scheme.detail_label),
                Span::styled(format_field(key, value), scheme.detail_value),
            ])
        })
        .collect()
}
