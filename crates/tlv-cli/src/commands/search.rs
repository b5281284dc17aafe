use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tlv_core::time::format_time;

use super::{FilterArgs, SourceArgs};

pub fn run(source: &SourceArgs, filter: &FilterArgs, query: &str) -> Result<(), String> {
    let mut viewer = super::open_filtered(source, filter)?;
    if let Some((_, view)) = viewer.parts_mut() {
        view.set_search(query);
    }

    let (doc, view) = super::loaded(&viewer)?;
    let results = view.filtered(doc);

    if results.is_empty() {
        println!("  No results for \"{query}\".");
        return Ok(());
    }

    println!("  {} results for \"{}\":", results.len(), query.bold());
    println!();

    let time_format = viewer.config().time_format;
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Page", "Time", "Channel", "Name", "Text"]);

    for (position, entry) in results.iter().enumerate() {
        let page = position / view.page_size() + 1;
        table.add_row(vec![
            entry.index.to_string(),
            page.to_string(),
            format_time(entry.time.as_deref(), time_format),
            entry.channel.clone(),
            entry.name.clone(),
            super::truncate(&entry.text, 60),
        ]);
    }

    println!("{table}");
    Ok(())
}
