/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;

use crate::app::App;

/// Render the CRUSH tree (left pane).
///
/// One row per visible node with connectors, a fold glyph for
/// parents, the label styled by CRUSH type and a status tag for
/// devices. The cursor row is highlighted; the selected node carries
/// a mark.
pub(crate) fn render_topology_tree(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let rows = app.visible_rows();
    let scheme = &app.theme.scheme;
    let labels = &app.theme.labels;
    let selected = app.selection.selected();

    let items: Vec<ListItem> = rows
        .as_slice()
        .iter()
        .enumerate()
        .map(|(vis_idx, row)| {
            let node = row.node;
            let indent = "  ".repeat(row.depth);
            let connector = if row.depth == 0 {
                ""
            } else if rows.has_sibling_after(vis_idx, row.depth) {
                "├─ "
            } else {
                "└─ "
            };
            let fold = if node.has_children() {
                if row.expanded { "▼ " } else { "▶ " }
            } else {
                "  "
            };

            let is_cursor = vis_idx == app.cursor.pos();
            let is_selected = selected.is_some() && node.source_id == selected;
            // Style precedence: cursor > selected > node kind.
            let style = if is_cursor {
                scheme.stat_selection.add_modifier(Modifier::BOLD)
            } else if is_selected {
                scheme.stat_selection
            } else {
                scheme.node_style(node.kind.as_deref())
            };
            let marker = if is_cursor {
                labels.selection_caret
            } else if is_selected {
                labels.selected_mark
            } else {
                "  "
            };

            let mut spans = vec![Span::styled(
                format!("{}{}{}{}{}", marker, indent, connector, fold, node.label),
                style,
            )];
            if let Some(status) = &node.status {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(status.clone(), scheme.status_style(status)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let block = Block::default()
        .title(labels.pane_topology)
        .borders(Borders::ALL)
        .border_style(scheme.border);

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default());
    let mut list_state = ListState::default()
        .with_selected(Some(app.cursor.pos()))
        .with_offset(app.tree_scroll_offset);
    frame.render_stateful_widget(list, area, &mut list_state);
}
