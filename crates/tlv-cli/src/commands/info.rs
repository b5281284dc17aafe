use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tlv_view::is_non_main_channel;

use super::SourceArgs;

pub fn run(source: &SourceArgs) -> Result<(), String> {
    let viewer = super::open(source)?;
    let (doc, view) = super::loaded(&viewer)?;

    println!("  {} [{}]", doc.title.bold(), doc.date.dimmed());
    if let Some(locator) = viewer.source() {
        println!("  source:     {locator}");
    }
    println!("  entries:    {}", doc.len());
    println!("  chapters:   {}", doc.chapters.len());
    println!("  pages:      {} (of {})", view.total_pages(doc), view.page_size());
    println!();

    let characters = doc.character_list();
    if !characters.is_empty() {
        println!("  {}", "Characters".bold());
        for name in &characters {
            let lines = doc.logs.iter().filter(|e| e.name == *name).count();
            println!("    {name} ({lines})");
        }
        println!();
    }

    let channels = doc.channel_list();
    if !channels.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Channel", "Entries", "Off-topic", "Collapsed"]);
        for channel in &channels {
            let count = doc
                .logs
                .iter()
                .filter(|e| !e.is_chapter && e.channel == *channel)
                .count();
            let off_topic = if is_non_main_channel(channel) { "yes" } else { "" };
            let collapsed = if view.is_collapsed(doc, channel) { "yes" } else { "" };
            table.add_row(vec![
                channel.to_string(),
                count.to_string(),
                off_topic.to_string(),
                collapsed.to_string(),
            ]);
        }
        println!("{table}");
    }

    Ok(())
}
