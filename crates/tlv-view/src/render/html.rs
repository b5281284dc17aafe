//! Self-contained HTML page for the current view.

use tlv_core::time::format_time;
use tlv_core::{Document, LogEntry};

use super::{navigation, page_status};
use crate::classify::roll_outcome;
use crate::config::ViewerConfig;
use crate::segment::ChannelGroup;
use crate::style::StyleResolver;
use crate::view::ViewState;

const PAGE_CSS: &str = "\
    body { font-family: sans-serif; max-width: 900px; margin: 2em auto; padding: 0 1em; color: #333; }
    header h1 { margin-bottom: 0.2em; }
    nav ol { padding-left: 1.2em; }
    nav li.current { font-weight: bold; }
    .chapter { padding: 0.8em 1em; margin: 1.5em 0 0.5em; border-radius: 6px; }
    .channel { padding: 0.5em; margin: 0.5em 0; border-radius: 6px; }
    .channel-header { font-weight: bold; margin-bottom: 0.3em; }
    .message { margin: 0.3em 0; }
    .name { display: inline-block; padding: 0 0.4em; border-radius: 4px; }
    .bubble { display: inline-block; padding: 0.3em 0.6em; border-radius: 6px; max-width: 80%; }
    .dice { margin-top: 0.2em; padding: 0.1em 0.5em; }
    .time { color: #999; font-size: 0.8em; margin-left: 0.5em; }
    .highlight .bubble { outline: 2px solid #f1c40f; }
    footer { margin-top: 2em; color: #666; }
";

/// Escape text for inclusion in HTML content or a double-quoted attribute.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text_to_html(s: &str) -> String {
    html_escape(s).replace('\n', "<br>")
}

/// Render the current page as a complete HTML document.
pub fn render_html(doc: &Document, view: &ViewState, config: &ViewerConfig) -> String {
    let styles = StyleResolver::new(doc);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"zh\">\n<head>\n");
    html.push_str(&format!(
        "  <meta charset=\"utf-8\">\n  <title>{}</title>\n",
        html_escape(&doc.title)
    ));
    html.push_str(&format!("  <style>\n{PAGE_CSS}  </style>\n</head>\n<body>\n"));

    html.push_str(&format!(
        "<header>\n  <h1>{}</h1>\n  <p class=\"date\">{}</p>\n</header>\n",
        html_escape(&doc.title),
        html_escape(&doc.date)
    ));

    html.push_str("<nav>\n  <ol>\n");
    for item in navigation(doc, view) {
        let class = if item.current { " class=\"current\"" } else { "" };
        html.push_str(&format!(
            "    <li{class}><a href=\"?page={}\">{}</a></li>\n",
            item.page,
            html_escape(&item.chapter.name)
        ));
    }
    html.push_str("  </ol>\n</nav>\n<main>\n");

    for group in view.channel_groups(doc) {
        if group.is_chapter() {
            render_chapter(&mut html, &styles, &group);
        } else {
            render_channel(&mut html, doc, view, config, &styles, &group);
        }
    }

    html.push_str(&format!(
        "</main>\n<footer>{}</footer>\n</body>\n</html>\n",
        html_escape(&page_status(doc, view))
    ));
    html
}

fn render_chapter(html: &mut String, styles: &StyleResolver<'_>, group: &ChannelGroup<'_>) {
    let banner = styles.chapter_banner();
    for entry in &group.messages {
        if entry.is_chapter {
            let title = tlv_core::chapter::chapter_title(&entry.text);
            html.push_str(&format!(
                "<section class=\"chapter\" id=\"{}\" style=\"{}\"><h2>{}</h2></section>\n",
                html_escape(&entry.id),
                html_escape(&banner.to_css()),
                html_escape(&title)
            ));
        } else {
            render_system(html, styles, entry);
        }
    }
}

fn render_channel(
    html: &mut String,
    doc: &Document,
    view: &ViewState,
    config: &ViewerConfig,
    styles: &StyleResolver<'_>,
    group: &ChannelGroup<'_>,
) {
    let collapsed = view.is_collapsed(doc, &group.channel);
    let background = styles.channel_background(&group.channel);
    html.push_str(&format!(
        "<section class=\"channel\" data-channel=\"{}\" data-collapsed=\"{collapsed}\" style=\"{}\">\n",
        html_escape(&group.channel),
        html_escape(&background.to_css())
    ));
    html.push_str(&format!(
        "  <div class=\"channel-header\" style=\"{}\">{} ({})</div>\n",
        html_escape(&styles.channel_header().to_css()),
        html_escape(&group.channel),
        group.messages.len()
    ));

    if collapsed {
        html.push_str("  <div class=\"messages\" hidden>\n");
    } else {
        html.push_str("  <div class=\"messages\">\n");
    }
    for entry in &group.messages {
        if entry.is_system() {
            render_system(html, styles, entry);
        } else {
            render_message(html, view, config, styles, entry);
        }
    }
    html.push_str("  </div>\n</section>\n");
}

fn render_system(html: &mut String, styles: &StyleResolver<'_>, entry: &LogEntry) {
    let prefix = styles
        .system_prefix()
        .map(|p| format!("{} ", html_escape(p)))
        .unwrap_or_default();
    html.push_str(&format!(
        "    <div class=\"system\" id=\"{}\" style=\"{}\">{prefix}{}</div>\n",
        html_escape(&entry.id),
        html_escape(&styles.system_text().to_css()),
        text_to_html(&entry.text)
    ));
    render_roll(html, styles, entry);
}

fn render_message(
    html: &mut String,
    view: &ViewState,
    config: &ViewerConfig,
    styles: &StyleResolver<'_>,
    entry: &LogEntry,
) {
    let class = if view.is_highlighted(entry) {
        "message highlight"
    } else {
        "message"
    };
    html.push_str(&format!("    <div class=\"{class}\" id=\"{}\">\n", html_escape(&entry.id)));

    if let Some(icon) = entry.icon.as_deref().filter(|i| !i.is_empty()) {
        html.push_str(&format!("      <img class=\"icon\" src=\"{}\" alt=\"\">\n", html_escape(icon)));
    }
    html.push_str(&format!(
        "      <span class=\"name\" style=\"{}\">{}</span>",
        html_escape(&styles.name_label(entry).to_css()),
        html_escape(&entry.name)
    ));
    if let Some(to) = entry.to.as_deref().filter(|t| !t.is_empty()) {
        html.push_str(&format!(" <span class=\"to\">→ {}</span>", html_escape(to)));
    }
    let time = format_time(entry.time.as_deref(), config.time_format);
    if !time.is_empty() {
        html.push_str(&format!("<span class=\"time\">{}</span>", html_escape(&time)));
    }
    html.push('\n');

    html.push_str(&format!(
        "      <div class=\"bubble\" style=\"{}\"><span style=\"{}\">{}</span></div>\n",
        html_escape(&styles.bubble(entry).to_css()),
        html_escape(&styles.dialog_text().to_css()),
        text_to_html(&entry.text)
    ));
    if let Some(image) = entry.message_image.as_deref().filter(|i| !i.is_empty()) {
        html.push_str(&format!(
            "      <img class=\"message-image\" src=\"{}\" alt=\"\">\n",
            html_escape(image)
        ));
    }
    render_roll(html, styles, entry);
    html.push_str("    </div>\n");
}

fn render_roll(html: &mut String, styles: &StyleResolver<'_>, entry: &LogEntry) {
    let Some(outcome) = roll_outcome(entry) else {
        return;
    };
    html.push_str(&format!(
        "      <div class=\"dice {}\" style=\"{}\">{}</div>\n",
        outcome.category.key(),
        html_escape(&styles.dice_line(outcome.category).to_css()),
        text_to_html(&outcome.display)
    ));
}
