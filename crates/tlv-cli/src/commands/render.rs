use std::path::Path;

use tlv_view::render::{render_html, render_markdown, render_plain};

use super::{FilterArgs, SourceArgs};

pub fn run(
    source: &SourceArgs,
    filter: &FilterArgs,
    format: &str,
    output: Option<&Path>,
    page: usize,
    all: bool,
) -> Result<(), String> {
    let mut viewer = super::open_filtered(source, filter)?;
    super::page::navigate(&mut viewer, page, None, all)?;

    let (doc, view) = super::loaded(&viewer)?;
    let config = viewer.config();
    let content = match format {
        "html" => render_html(doc, view, config),
        "markdown" | "md" => render_markdown(doc, view, config),
        "text" | "txt" => render_plain(doc, view, config),
        _ => {
            return Err(format!(
                "unsupported format: \"{format}\". Use: html, markdown, text"
            ));
        }
    };

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Rendered to {}", path.display());
    } else {
        print!("{content}");
    }

    Ok(())
}
