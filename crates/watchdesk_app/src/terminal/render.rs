//! Plain-text rendering of the view model.

use std::fmt::Write as _;

use watchdesk_core::{
    AppViewModel, ChatMessage, ChatRole, ChangeListView, DetailView, Health, InputMode,
    LandingView, LiveView, Notification, PreviewState, ScreenView, Severity, StatusTone,
    TimelineReadyView, TimelineView, WatchSummaryView,
};

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "── {} ──", view.path);
    match &view.screen {
        ScreenView::Landing(landing) => render_landing(&mut out, landing),
        ScreenView::Detail(detail) => render_detail(&mut out, detail),
        ScreenView::Live(live) => render_live(&mut out, live),
        ScreenView::Timeline(timeline) => render_timeline(&mut out, timeline),
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let marker = match notification.severity {
        Severity::Info => "*",
        Severity::Error => "!",
    };
    format!(
        "[{marker}] {}: {}",
        notification.title, notification.description
    )
}

fn render_landing(out: &mut String, view: &LandingView) {
    match view.mode {
        InputMode::Url => {
            let _ = writeln!(out, "URL: {}", view.url_text);
            if let Some(error) = view.url_error {
                let _ = writeln!(out, "  {error}");
            }
            let preview = match view.preview {
                PreviewState::Invalid => "enter a URL to preview",
                PreviewState::Loading => "checking whether the page can be previewed...",
                PreviewState::Valid => "ready (`preview`, `monitor`)",
                PreviewState::Blocked => "blocked; use `external` to open it in a browser",
            };
            let _ = writeln!(out, "Preview: {preview}");
            if let Some(reason) = &view.blocked_reason {
                let _ = writeln!(out, "  reason: {reason}");
            }
        }
        InputMode::Chat => {
            render_chat(out, &view.chat, view.chat_pending);
        }
    }

    let _ = writeln!(out);
    match &view.recent {
        None => {
            let _ = writeln!(out, "Recent watches: loading...");
        }
        Some(rows) if rows.is_empty() => {
            let _ = writeln!(out, "Recent watches: none yet");
        }
        Some(rows) => {
            let _ = writeln!(out, "Recent watches:");
            for row in rows {
                let mut flags = String::new();
                if row.deleting {
                    flags.push_str(" (deleting)");
                }
                if row.rescanning {
                    flags.push_str(" (scanning)");
                }
                let _ = writeln!(
                    out,
                    "  [{}] {} {} - {} [{}] {}{}",
                    row.id,
                    health_marker(row.health),
                    row.title,
                    row.domain,
                    status_badge(&row.status, row.tone),
                    row.time_ago.as_deref().unwrap_or(""),
                    flags
                );
                let _ = writeln!(out, "       {}", row.health_description);
            }
        }
    }
    if let Some(id) = &view.confirm_delete {
        let _ = writeln!(
            out,
            "Delete watch {id}? This removes it and its scan history. (`yes` / `no`)"
        );
    }
    if !view.general_call_enabled {
        let _ = writeln!(out, "General call in progress...");
    }
}

fn render_detail(out: &mut String, view: &DetailView) {
    match view {
        DetailView::Loading => {
            let _ = writeln!(out, "Loading watch...");
        }
        DetailView::NotFound => {
            let _ = writeln!(out, "Watch not found. The watch may have been deleted.");
        }
        DetailView::Ready(summary) => render_summary(out, summary),
    }
}

fn render_live(out: &mut String, view: &LiveView) {
    if view.url.is_empty() {
        let _ = writeln!(out, "Loading watch...");
        return;
    }
    let kind = if view.is_draft { "Preview" } else { "Live" };
    let _ = writeln!(out, "{kind}: {} ({})", view.title, view.url);
    if let Some(summary) = &view.watch {
        render_summary(out, summary);
    }
    match view.preview {
        PreviewState::Loading => {
            let _ = writeln!(out, "Preview: loading...");
        }
        PreviewState::Blocked => {
            let _ = writeln!(
                out,
                "Preview Not Available: this site cannot be shown embedded (`external` to open it in a new tab)"
            );
            if let Some(reason) = &view.blocked_reason {
                let _ = writeln!(out, "  reason: {reason}");
            }
        }
        PreviewState::Valid => {
            let _ = writeln!(out, "Preview: available");
        }
        PreviewState::Invalid => {}
    }
    if view.creating {
        let _ = writeln!(out, "Starting to monitor...");
    } else if view.can_create {
        let _ = writeln!(out, "Not monitored yet (`create` to start monitoring)");
    }
    if view.scanning {
        let _ = writeln!(out, "Scanning...");
    } else if view.can_scan {
        let _ = writeln!(out, "`scan` to check for changes now");
    }
    let _ = writeln!(out);
    render_chat(out, &view.chat, view.chat_pending);
}

fn render_timeline(out: &mut String, view: &TimelineView) {
    let view = match view {
        TimelineView::Loading => {
            let _ = writeln!(out, "Loading timeline...");
            return;
        }
        TimelineView::NotFound => {
            let _ = writeln!(out, "Watch not found.");
            return;
        }
        TimelineView::Ready(view) => view,
    };
    render_timeline_ready(out, view);
}

fn render_timeline_ready(out: &mut String, view: &TimelineReadyView) {
    let _ = writeln!(
        out,
        "{} ({}) - {} scans{}",
        view.watch.title,
        view.watch.domain,
        view.total_scans,
        view.category
            .as_deref()
            .map(|c| format!(", {c}"))
            .unwrap_or_default()
    );
    if view.scanning {
        let _ = writeln!(out, "Scanning...");
    } else if view.refresh_pending {
        let _ = writeln!(out, "Scan triggered; refreshing shortly...");
    }
    if view.entries.is_empty() {
        let _ = writeln!(out, "No scans yet.");
    }
    for entry in &view.entries {
        let cursor = if entry.selected { ">" } else { " " };
        let _ = writeln!(
            out,
            "{cursor} [{}] {} ({}) {}",
            entry.id,
            entry.title,
            entry.badge,
            entry.time_ago.as_deref().unwrap_or("")
        );
        let _ = writeln!(out, "      {}", entry.description);
    }
    if let Some(selected) = &view.selected {
        let _ = writeln!(out);
        let _ = writeln!(out, "Scan {} at {} - {}", selected.id, selected.date, selected.health.label());
        if let Some(summary) = &selected.change_summary {
            let _ = writeln!(out, "  Changes: {summary}");
        }
        if let Some(summary) = &selected.current_summary {
            let _ = writeln!(out, "  Page: {summary}");
        }
        render_changes(out, &selected.changes);
        if let Some(preview) = &selected.raw_content_preview {
            let _ = writeln!(out, "  Content: {preview}");
        }
    }
}

fn render_summary(out: &mut String, summary: &WatchSummaryView) {
    let _ = writeln!(
        out,
        "{} [{}] {}",
        summary.title,
        status_badge(&summary.status, summary.tone),
        summary.url
    );
    if !summary.desc.is_empty() {
        let _ = writeln!(out, "  {}", summary.desc);
    }
    let _ = writeln!(
        out,
        "  {} {}: {}",
        health_marker(summary.health),
        summary.health_label,
        summary.health_description
    );
    if let Some(scan) = &summary.latest_scan {
        let _ = writeln!(
            out,
            "  Last scan {}",
            scan.scanned_ago.as_deref().unwrap_or("at an unknown time")
        );
        if let Some(current) = &scan.current_summary {
            let _ = writeln!(out, "  Page: {current}");
        }
        render_changes(out, &scan.changes);
    }
}

fn render_changes(out: &mut String, changes: &ChangeListView) {
    for line in &changes.additions {
        let _ = writeln!(out, "  + {line}");
    }
    for line in &changes.deletions {
        let _ = writeln!(out, "  - {line}");
    }
    for line in &changes.modifications {
        let _ = writeln!(out, "  ~ {line}");
    }
}

fn render_chat(out: &mut String, messages: &[ChatMessage], pending: bool) {
    for message in messages {
        let who = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "assistant",
            ChatRole::Tool => "...",
        };
        let _ = writeln!(out, "{who} #{}: {}", message.id, message.content);
        if let Some(url) = &message.found_url {
            let _ = writeln!(out, "    found {url} (`track {}` to monitor it)", message.id);
        }
    }
    if !pending {
        let _ = writeln!(out, "(`ask <text>` to chat)");
    }
}

/// Rows that need attention are bracketed with `<>` instead of `()`.
fn health_marker(health: Health) -> String {
    let glyph = match health {
        Health::NoScan => "?",
        Health::Stable => "=",
        Health::Minor => "~",
        Health::Moderate => "!",
        Health::Major => "!!",
    };
    if health.needs_attention() {
        format!("<{glyph}>")
    } else {
        format!("({glyph})")
    }
}

fn status_badge(status: &str, tone: StatusTone) -> String {
    match tone {
        StatusTone::Destructive => status.to_uppercase(),
        _ => status.to_string(),
    }
}
