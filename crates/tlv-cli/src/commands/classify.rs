use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tlv_view::classify::{classify_text, display_text};
use tlv_view::{classify, roll_outcome};

use super::SourceArgs;

pub fn run(source: &SourceArgs, text: Option<&str>) -> Result<(), String> {
    if let Some(text) = text {
        let category = classify_text(text);
        println!("  {} [{}]", category.to_string().bold(), category.key());
        let display = display_text(text, category);
        if display != text {
            println!("  {display}");
        }
        return Ok(());
    }

    let viewer = super::open(source)?;
    let (doc, _) = super::loaded(&viewer)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Result", "Category"]);

    let mut rolls = 0;
    for entry in &doc.logs {
        let category = classify(entry);
        let shown = match roll_outcome(entry) {
            Some(outcome) => outcome.display,
            None if entry.is_system() && category != tlv_view::ResultCategory::Normal => {
                entry.text.clone()
            }
            None => continue,
        };
        rolls += 1;
        table.add_row(vec![
            entry.index.to_string(),
            entry.name.clone(),
            super::truncate(&shown, 60),
            category.key().to_string(),
        ]);
    }

    if rolls == 0 {
        println!("  No rolls found.");
        return Ok(());
    }

    println!("{table}");
    println!();
    println!("  {rolls} rolls");
    Ok(())
}
