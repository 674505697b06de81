use std::fmt::Write as _;

use catalog_core::{sort_projection, Character, SearchViewModel, SortOption};

pub const TITLE: &str = "Star Wars Character Search";

/// Presentation-only settings applied on top of the snapshot.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub sort: Option<SortOption>,
    pub updated_at: Option<String>,
}

pub fn render(view: &SearchViewModel, options: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {TITLE} ==");

    if view.is_initializing {
        let _ = writeln!(out, "Loading...");
        return out;
    }

    if !view.term.is_empty() {
        let _ = writeln!(out, "Search: {:?}", view.term);
    }
    let sort_label = options
        .sort
        .map(|option| format!(" | sorted {}", option.label()))
        .unwrap_or_default();
    let _ = writeln!(out, "{}{}", view.results_summary(), sort_label);

    for (i, character) in sort_projection(&view.characters, options.sort)
        .iter()
        .enumerate()
    {
        let _ = writeln!(out, "{:>3}. {}", i + 1, format_card(character));
    }

    if view.is_loading {
        let _ = writeln!(out, "Loading...");
    } else if view.can_load_more {
        let _ = writeln!(out, "[/more] Load more");
    }

    let mut status = Vec::new();
    if let Some(updated_at) = &options.updated_at {
        status.push(format!("updated {updated_at}"));
    }
    if let Some(failure) = &view.last_failure {
        status.push(format!("last request failed: {failure}"));
    }
    if !status.is_empty() {
        let _ = writeln!(out, "-- {}", status.join(" | "));
    }
    out
}

fn format_card(character: &Character) -> String {
    let mut card = format!(
        "{:<28} {:<10} born {}",
        character.name,
        character.gender.label(),
        character.birth_year
    );
    if character.height != "unknown" && !character.height.is_empty() {
        let _ = write!(card, ", {} cm", character.height);
    }
    if character.mass != "unknown" && !character.mass.is_empty() {
        let _ = write!(card, ", {} kg", character.mass);
    }
    card.trim_end().to_string()
}
