use colored::{ColoredString, Colorize};
use tlv_core::chapter::chapter_title;
use tlv_core::time::format_time;
use tlv_core::{Document, LogEntry};
use tlv_view::render::page_status;
use tlv_view::style::Rgba;
use tlv_view::{ResultCategory, StyleResolver, ViewError, ViewMode, ViewState, Viewer, roll_outcome};

use super::{FilterArgs, SourceArgs};

pub fn run(
    source: &SourceArgs,
    filter: &FilterArgs,
    page: usize,
    chapter: Option<&str>,
    all: bool,
) -> Result<(), String> {
    let mut viewer = super::open_filtered(source, filter)?;
    navigate(&mut viewer, page, chapter, all)?;

    let (doc, view) = super::loaded(&viewer)?;
    let time_format = viewer.config().time_format;
    print_page(doc, view, time_format);
    Ok(())
}

/// Move the view to the requested page, chapter, or show-all mode.
pub(super) fn navigate(
    viewer: &mut Viewer,
    page: usize,
    chapter: Option<&str>,
    all: bool,
) -> Result<(), String> {
    let Some((doc, view)) = viewer.parts_mut() else {
        return Err(ViewError::NotLoaded.to_string());
    };
    if all {
        view.set_mode(ViewMode::All);
        return Ok(());
    }
    if let Some(wanted) = chapter {
        let id = doc
            .navigation_chapters()
            .into_iter()
            .find(|c| c.id == wanted || c.name.eq_ignore_ascii_case(wanted))
            .map(|c| c.id)
            .ok_or_else(|| format!("chapter not found: \"{wanted}\""))?;
        view.jump_to_chapter(doc, &id).map_err(|e| e.to_string())?;
        return Ok(());
    }
    view.jump_to_page(doc, page).map_err(|e| e.to_string())
}

fn print_page(doc: &Document, view: &ViewState, time_format: tlv_core::time::TimeFormat) {
    let styles = StyleResolver::new(doc);

    println!("  {} [{}]", doc.title.bold(), page_status(doc, view).dimmed());
    if let Some(chapter) = view.current_chapter(doc) {
        println!(
            "  {} (page {} of {})",
            chapter.name.dimmed(),
            view.page_in_chapter(doc),
            view.chapter_total_pages(doc)
        );
    }
    println!();

    let groups = view.channel_groups(doc);
    if groups.is_empty() {
        println!("  No entries.");
        return;
    }

    for group in groups {
        if group.is_chapter() {
            for entry in &group.messages {
                if entry.is_chapter {
                    println!("  {}", format!("=== {} ===", chapter_title(&entry.text)).bold().cyan());
                } else {
                    print_system(&styles, entry);
                }
            }
            println!();
            continue;
        }

        println!("  [{}]", group.channel.bold());
        if view.is_collapsed(doc, &group.channel) {
            println!("    {}", format!("({} collapsed)", group.messages.len()).dimmed());
            println!();
            continue;
        }
        for entry in &group.messages {
            if entry.is_system() {
                print_system(&styles, entry);
                continue;
            }
            let time = format_time(entry.time.as_deref(), time_format);
            let name = paint(&entry.name, &styles.name_color(entry));
            let text = if view.is_highlighted(entry) {
                entry.text.on_yellow().black()
            } else {
                entry.text.normal()
            };
            if time.is_empty() {
                println!("    {name}: {text}");
            } else {
                println!("    {} {name}: {text}", time.dimmed());
            }
            print_roll(entry);
        }
        println!();
    }
}

fn print_system(styles: &StyleResolver<'_>, entry: &LogEntry) {
    let prefix = styles.system_prefix().unwrap_or_default();
    println!("    {}", format!("{prefix} {}", entry.text).trim().italic().dimmed());
    print_roll(entry);
}

fn print_roll(entry: &LogEntry) {
    let Some(outcome) = roll_outcome(entry) else {
        return;
    };
    let line = format!("{} [{}]", outcome.display, outcome.category);
    let line = match outcome.category {
        ResultCategory::CriticalSuccess => line.yellow().bold(),
        ResultCategory::CriticalFailure => line.red().bold(),
        ResultCategory::Success => line.green(),
        ResultCategory::Failure => line.red(),
        ResultCategory::Normal => line.normal(),
    };
    println!("      {line}");
}

fn paint(text: &str, color: &str) -> ColoredString {
    match Rgba::from_hex(color, 1.0) {
        Some(c) => text.truecolor(c.r, c.g, c.b).bold(),
        None => text.bold(),
    }
}
