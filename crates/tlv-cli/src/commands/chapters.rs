use comfy_table::{ContentArrangement, Table};

use super::{FilterArgs, SourceArgs};

pub fn run(source: &SourceArgs, filter: &FilterArgs) -> Result<(), String> {
    let viewer = super::open_filtered(source, filter)?;
    let (doc, view) = super::loaded(&viewer)?;

    let chapters = doc.navigation_chapters();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Chapter", "Start", "Entries", "Page", "Id"]);

    for (i, chapter) in chapters.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            chapter.name.clone(),
            chapter.start_index.to_string(),
            chapter.message_count.to_string(),
            view.chapter_page(doc, chapter).to_string(),
            chapter.id.clone(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} chapters", chapters.len());

    Ok(())
}
