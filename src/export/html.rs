//! HTML Export Generation
//!
//! Turns a laid-out persona card into a standalone HTML document with the
//! card styling inlined, or into a bare fragment for the clipboard.

use crate::error::{Error, Result};
use crate::render::{CardLayout, SectionLayout};
use crate::theme::{CardColors, ThemeColors};
use log::info;
use std::fmt::Write as _;
use std::path::Path;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete HTML document for a card.
pub fn generate_html_document(layout: &CardLayout, title: &str, colors: &ThemeColors) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Persona Card">
    <title>{title}</title>
    <style>
{base_css}

{theme_css}
    </style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
        base_css = BASE_CSS,
        theme_css = generate_theme_css(colors),
        body = generate_html_fragment(layout),
    )
}

/// Generate the card markup alone (no doctype, head or styles).
pub fn generate_html_fragment(layout: &CardLayout) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        r#"<article class="persona-card" data-columns="{}">"#,
        layout.columns.max(1)
    );

    for row in layout.rows() {
        let full = row.len() == 1 && row[0].spans_full_width();
        let class = if full { "row full" } else { "row" };
        let _ = writeln!(html, r#"  <div class="{}">"#, class);
        for section in row {
            write_section(&mut html, section);
        }
        html.push_str("  </div>\n");
    }

    html.push_str("</article>\n");
    html
}

fn write_section(html: &mut String, section: &SectionLayout) {
    match section {
        SectionLayout::Placeholder { title, message } => {
            let _ = writeln!(
                html,
                "    <section class=\"placeholder\">\n      <h2>{}</h2>\n      <p>{}</p>\n    </section>",
                html_escape(title),
                html_escape(message)
            );
        }
        SectionLayout::NameSummary { name, summary }
        | SectionLayout::ScalarInputs { name, summary } => {
            let _ = writeln!(html, "    <section class=\"identity\">");
            let _ = writeln!(html, "      <h1>{}</h1>", html_escape(name));
            if !summary.is_empty() {
                let _ = writeln!(html, "      <p>{}</p>", html_escape(summary));
            }
            html.push_str("    </section>\n");
        }
        SectionLayout::BulletList { title, items, .. } => {
            let _ = writeln!(html, "    <section>\n      <h3>{}</h3>", html_escape(title));
            html.push_str("      <ul>\n");
            for item in items {
                let _ = writeln!(html, "        <li>{}</li>", html_escape(item));
            }
            html.push_str("      </ul>\n    </section>\n");
        }
        SectionLayout::Chips { title, items, .. } => {
            write_chips(html, title, items.iter().map(String::as_str));
        }
        SectionLayout::TagEditor { title, tags, .. } => {
            write_chips(html, title, tags.iter().map(|t| t.text.as_str()));
        }
    }
}

fn write_chips<'a>(html: &mut String, title: &str, items: impl Iterator<Item = &'a str>) {
    let _ = writeln!(html, "    <section>\n      <h3>{}</h3>", html_escape(title));
    html.push_str("      <div class=\"chips\">");
    for item in items {
        let _ = write!(html, "<span class=\"chip\">{}</span>", html_escape(item));
    }
    html.push_str("</div>\n    </section>\n");
}

/// Plain-text rendering of a card, one section per paragraph.
///
/// List items are joined with `", "`.
pub fn generate_plain_text(layout: &CardLayout) -> String {
    let mut blocks = Vec::new();
    for section in &layout.sections {
        let block = match section {
            SectionLayout::Placeholder { title, message } => format!("{}\n{}", title, message),
            SectionLayout::NameSummary { name, summary }
            | SectionLayout::ScalarInputs { name, summary } => {
                if summary.is_empty() {
                    name.clone()
                } else {
                    format!("{}\n{}", name, summary)
                }
            }
            SectionLayout::BulletList { title, items, .. }
            | SectionLayout::Chips { title, items, .. } => {
                format!("{}\n{}", title, items.join(", "))
            }
            SectionLayout::TagEditor { title, tags, .. } => {
                let texts: Vec<&str> = tags.iter().map(|t| t.text.as_str()).collect();
                format!("{}\n{}", title, texts.join(", "))
            }
        };
        blocks.push(block);
    }
    blocks.join("\n\n")
}

/// Write a card to an HTML file.
pub fn export_card_to_file(
    output_path: &Path,
    layout: &CardLayout,
    title: &str,
    colors: &ThemeColors,
) -> Result<()> {
    let html = generate_html_document(layout, title, colors);
    std::fs::write(output_path, html).map_err(|e| Error::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;
    info!("Exported card to {}", output_path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Layout and typography shared by both themes.
const BASE_CSS: &str = r#"
* { box-sizing: border-box; }

body {
    margin: 0;
    padding: 32px 16px;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.5;
}

.persona-card {
    max-width: 860px;
    margin: 0 auto;
    padding: 24px;
    border-radius: 12px;
}

.persona-card .row {
    display: grid;
    gap: 16px;
    margin-bottom: 16px;
}

.persona-card[data-columns="2"] .row { grid-template-columns: 1fr 1fr; }
.persona-card .row.full { grid-template-columns: 1fr; }

.persona-card h1 { margin: 0 0 6px; font-size: 1.8em; }
.persona-card h2 { margin: 0 0 8px; text-align: center; }
.persona-card h3 { margin: 0 0 6px; font-size: 1.15em; }
.persona-card p { margin: 0; }
.persona-card ul { margin: 0; padding-left: 20px; }
.persona-card .placeholder { text-align: center; padding: 40px 0; }

.chips { display: flex; flex-wrap: wrap; gap: 6px; }

.chip {
    display: inline-block;
    padding: 3px 10px;
    border-radius: 12px;
    font-size: 0.9em;
}
"#;

/// Colors for the page and the card.
fn generate_theme_css(colors: &ThemeColors) -> String {
    let card = &colors.card;
    format!(
        r#"
:root {{ color-scheme: {scheme}; }}

body {{
    background-color: {page_bg};
    color: {page_text};
}}

.persona-card {{
    background-color: {card_bg};
    border: 1px solid {card_border};
    color: {card_text};
    box-shadow: 0 6px 18px rgba(0, 0, 0, {shadow:.2});
}}

.persona-card h3 {{ color: {section_title}; }}

.chip {{
    background-color: {chip_fill};
    color: {chip_text};
}}
"#,
        scheme = if colors.is_dark() { "dark" } else { "light" },
        page_bg = CardColors::css(colors.base.background),
        page_text = CardColors::css(colors.text.primary),
        card_bg = CardColors::css(card.background),
        card_border = CardColors::css(card.border),
        card_text = CardColors::css(card.text),
        shadow = f32::from(card.shadow_alpha) / 255.0,
        section_title = CardColors::css(card.section_title),
        chip_fill = CardColors::css(card.chip_fill),
        chip_text = CardColors::css(card.chip_text),
    )
}

/// HTML-escape a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
