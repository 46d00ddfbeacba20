//! Terminal output: messages, the tab strip, the active view and listings.
//!
//! Everything is built as a `String` first and printed by the caller, so the
//! formatting can be tested without capturing stdout.

use chrono::{DateTime, Utc};
use colored::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use urbrain::api::UrbrainApi;
use urbrain::commands::{CmdMessage, MessageLevel};
use urbrain::entities::EntityStore;
use urbrain::model::{Folder, Note};
use urbrain::store::BlobStore;
use urbrain::view::{content_preview, ActiveView, View, ViewRenderer};

const TAB_TITLE_WIDTH: usize = 18;
const SHORT_ID_LEN: usize = 8;
const INDENT: &str = "  ";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Prints the tab strip and the active view after every committed change.
pub struct TerminalRenderer {
    preview_length: usize,
    muted: bool,
}

impl TerminalRenderer {
    /// Starts muted: one-shot commands only print their messages.
    pub fn new(preview_length: usize) -> Self {
        Self {
            preview_length,
            muted: true,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl ViewRenderer for TerminalRenderer {
    fn render(&mut self, view: &View<'_>) {
        if self.muted {
            return;
        }
        println!("{}", format_view(view, self.preview_length));
    }
}

pub fn format_view(view: &View<'_>, preview_length: usize) -> String {
    let strip = format_tab_strip(view);
    let rule = "─".repeat(strip.width().max(20));
    format!(
        "\n{}\n{}\n{}",
        strip,
        rule.dimmed(),
        format_active(&view.active, preview_length)
    )
}

pub fn format_tab_strip(view: &View<'_>) -> String {
    view.tabs
        .iter()
        .map(|tab| {
            let title = truncate_to_width(&tab.title, TAB_TITLE_WIDTH);
            if tab.id == view.active_id {
                format!("[{} {}]", tab.id, title).bold().to_string()
            } else {
                format!(" {} {} ", tab.id, title).dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}

pub fn format_active(active: &ActiveView<'_>, preview_length: usize) -> String {
    let mut out = String::new();
    match active {
        ActiveView::Home {
            root_folders,
            sticky_count,
        } => {
            out.push_str(&format!("{}\n", "Home".bold()));
            if root_folders.is_empty() {
                out.push_str(&format!("{}{}\n", INDENT, "No folders yet.".dimmed()));
            }
            for folder in root_folders {
                out.push_str(&format!("{}{}\n", INDENT, folder_line(folder)));
            }
            if *sticky_count > 0 {
                out.push_str(&format!(
                    "{}{}\n",
                    INDENT,
                    format!("{} sticky note(s)", sticky_count).dimmed()
                ));
            }
        }
        ActiveView::Folder {
            folder,
            trail,
            subfolders,
            notes,
        } => {
            let crumbs: Vec<String> = trail.iter().map(|f| f.name.clone()).collect();
            out.push_str(&format!("{}\n", crumbs.join(" / ").bold()));
            out.push_str(&format!("{}{}\n", INDENT, short_id(&folder.id).dimmed()));
            if subfolders.is_empty() && notes.is_empty() {
                out.push_str(&format!("{}{}\n", INDENT, "This folder is empty.".dimmed()));
            }
            for sub in subfolders {
                out.push_str(&format!("{}{}\n", INDENT, folder_line(sub)));
            }
            for note in notes {
                out.push_str(&format!("{}{}\n", INDENT, note_line(note)));
                out.push_str(&format!(
                    "{}{}{}\n",
                    INDENT,
                    INDENT,
                    content_preview(&note.content, preview_length).dimmed()
                ));
            }
        }
        ActiveView::Note { note, folder } => {
            out.push_str(&format_note(note, *folder));
        }
        ActiveView::Sticky { id } => {
            out.push_str(&format!("{} {}\n", "Sticky note".bold(), id));
        }
    }
    out
}

pub fn format_note(note: &Note, folder: Option<&Folder>) -> String {
    let mut out = format!("{}\n", note.title.bold());
    let location = folder
        .map(|f| format!("in {}", f.name))
        .unwrap_or_else(|| "in a missing folder".to_string());
    out.push_str(&format!(
        "{}\n",
        format!(
            "{}, {}, edited {}",
            short_id(&note.id),
            location,
            format_time_ago(note.modified_at)
        )
        .dimmed()
    ));
    out.push('\n');
    if note.content.trim().is_empty() {
        out.push_str(&format!("{}\n", "No content yet...".dimmed()));
    } else {
        out.push_str(&note.content);
        out.push('\n');
    }
    out
}

/// Indented tree of every folder reachable from the top level.
pub fn format_folder_tree(entities: &EntityStore) -> String {
    let hierarchy = entities.hierarchy();
    let roots = hierarchy.root_folders();
    if roots.is_empty() {
        return "No folders yet.".to_string();
    }

    let mut out = String::new();
    let mut stack: Vec<(&Folder, usize)> = roots.into_iter().rev().map(|f| (f, 0)).collect();
    while let Some((folder, depth)) = stack.pop() {
        let count = hierarchy.item_count(folder.id);
        out.push_str(&format!(
            "{}{}  {}  {}\n",
            INDENT.repeat(depth),
            short_id(&folder.id).yellow(),
            folder.name,
            format!("({} item{})", count, if count == 1 { "" } else { "s" }).dimmed()
        ));
        for child in hierarchy.direct_children(folder.id).into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    out.trim_end().to_string()
}

fn folder_line(folder: &Folder) -> String {
    format!("{} {}/", short_id(&folder.id).yellow(), folder.name)
}

fn note_line(note: &Note) -> String {
    format!(
        "{} {}  {}",
        short_id(&note.id).cyan(),
        note.title,
        format_time_ago(note.modified_at).dimmed()
    )
}

fn short_id(id: &impl ToString) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

/// Cuts `s` to at most `max_width` terminal columns, ending with `…` if cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

/// Prints the current view regardless of muting.
pub fn print_view<S: BlobStore>(api: &UrbrainApi<S, TerminalRenderer>) {
    let preview_length = api.config().preview_length;
    println!("{}", format_view(&api.view(), preview_length));
}

#[cfg(test)]
mod tests {
    use super::*;
    use urbrain::tabs::TabTarget;
    use urbrain::workspace::Workspace;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // Wide characters take two columns each.
        assert_eq!(truncate_to_width("日本語テキスト", 6), "日本…");
    }

    #[test]
    fn tab_strip_marks_active_tab() {
        plain();
        let mut ws = Workspace::default();
        let work = ws.entities.create_folder("Work", None).unwrap();
        ws.tabs.open(TabTarget::Folder(work.id), "Work");

        let view = View::build(&ws);
        let strip = format_tab_strip(&view);
        assert_eq!(strip, " tab-1 Home |[tab-2 Work]");
    }

    #[test]
    fn long_tab_titles_are_cut() {
        plain();
        let mut ws = Workspace::default();
        let title = "An extremely long folder name indeed";
        let f = ws.entities.create_folder(title, None).unwrap();
        ws.tabs.open(TabTarget::Folder(f.id), title);

        let strip = format_tab_strip(&View::build(&ws));
        assert!(strip.contains('…'));
        assert!(!strip.contains("indeed"));
    }

    #[test]
    fn folder_view_shows_breadcrumb_and_previews() {
        plain();
        let mut ws = Workspace::default();
        let root = ws.entities.create_folder("Work", None).unwrap();
        let sub = ws.entities.create_folder("Plans", Some(root.id)).unwrap();
        ws.entities.create_note("Q3", sub.id, "").unwrap();
        ws.tabs.open(TabTarget::Folder(sub.id), "Plans");

        let text = format_active(&View::build(&ws).active, 80);
        assert!(text.starts_with("Work / Plans\n"));
        assert!(text.contains("Q3"));
        assert!(text.contains("No content yet..."));
    }

    #[test]
    fn empty_home_says_so() {
        plain();
        let ws = Workspace::default();
        let text = format_active(&View::build(&ws).active, 80);
        assert!(text.contains("No folders yet."));
    }

    #[test]
    fn tree_is_indented_by_depth() {
        plain();
        let mut entities = EntityStore::new();
        let a = entities.create_folder("A", None).unwrap();
        let b = entities.create_folder("B", Some(a.id)).unwrap();
        entities.create_note("n", b.id, "").unwrap();

        let tree = format_folder_tree(&entities);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&short_id(&a.id)));
        assert!(lines[0].ends_with("(1 item)"));
        assert!(lines[1].starts_with("  "));
        assert!(lines[1].contains("B"));
    }
}
