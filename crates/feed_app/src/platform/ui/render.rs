use feed_core::{AppViewModel, ItemRow};

use super::constants::RULE;

/// Renders the whole view as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.items.len() * 2 + 5);

    lines.push(RULE.to_string());
    lines.push(format!("Search: {:?}", view.search_text));
    lines.push(format!(
        "{} | {} | {}",
        button("\u{25c0} Prev", view.can_prev),
        view.status_line(),
        button("Next \u{25b6}", view.can_next),
    ));

    if let Some(error) = &view.error {
        lines.push(format!("Error: {error}"));
    }
    if view.loading {
        lines.push("Loading\u{2026}".to_string());
    }

    for item in &view.items {
        lines.extend(item_lines(item));
    }
    lines
}

fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!(" {label} ")
    }
}

fn item_lines(item: &ItemRow) -> [String; 2] {
    let header = match item.published_at {
        Some(published) => format!("  {} \u{00b7} {}", item.source, published.format("%Y-%m-%d %H:%M")),
        None => format!("  {}", item.source),
    };
    [header, format!("    {} <{}>", item.title, item.url)]
}
