//! Page previews: assemble a complete wrapped page for one editor entry.
//!
//! Each collection mirrors the live-site template it previews. Rendering is
//! total; entries with missing or malformed front matter fall back to the
//! same placeholders the editor shows for a blank page.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::application::render::sections::render_block;
use crate::application::render::{WrapOptions, escape_html, markdown_to_html, wrap_page};
use crate::domain::blocks::ContentBlock;
use crate::domain::pages::{
    CuratorialEntry, CustomPageEntry, PageDocument, PageKind, PressEntry,
};

/// Render one entry as a full preview page.
pub fn render_page(doc: &PageDocument, now: DateTime<Utc>) -> String {
    match doc.kind {
        PageKind::Home => render_home(doc, now),
        PageKind::Curatorial => render_curatorial(doc),
        PageKind::Press => render_press(doc),
        PageKind::Custom => render_custom(doc, now),
    }
}

fn render_blocks(blocks: &[ContentBlock], now: DateTime<Utc>) -> String {
    blocks.iter().map(|block| render_block(block, now)).collect()
}

fn render_home(doc: &PageDocument, now: DateTime<Utc>) -> String {
    let blocks = doc.sections();
    let content = if blocks.is_empty() {
        r#"<div class="preview-empty">No sections added yet. Add sections using the editor.</div>"#
            .to_string()
    } else {
        render_blocks(&blocks, now)
    };
    wrap_page(&content, &WrapOptions::page_class("preview-page--home"))
}

fn entry<T: Default + serde::de::DeserializeOwned>(doc: &PageDocument) -> T {
    serde_json::from_value(doc.data.clone()).unwrap_or_default()
}

fn render_curatorial(doc: &PageDocument) -> String {
    let data: CuratorialEntry = entry(doc);
    let article_type = data.article_type.as_deref().unwrap_or("CURATORIAL RECOMMENDATION");
    let article_title = data.article_title.as_deref().unwrap_or("Essay Title");

    let mut html = String::from(concat!(
        r#"<header class="article-header"><div class="article-header-content">"#,
        r#"<a href="/" class="breadcrumb">"#,
        r#"<svg width="16" height="16" viewBox="0 0 16 16" fill="none" stroke="currentColor" stroke-width="2"><path d="M10 12L6 8L10 4"/></svg>"#,
        " Back to Artwork</a>"
    ));
    let _ = write!(
        html,
        r#"<div class="article-label">{}</div><h1 class="article-title">{}</h1>"#,
        escape_html(article_type),
        escape_html(article_title)
    );
    if let Some(author) = data.author.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="article-byline">By {}</p>"#, escape_html(author));
    }
    html.push_str(r#"<div class="article-meta">"#);
    let read_time = data.read_time.as_deref().filter(|v| !v.is_empty());
    let publish_date = data.publish_date.as_deref().filter(|v| !v.is_empty());
    if let Some(read_time) = read_time {
        let _ = write!(html, "<span>{}</span>", escape_html(read_time));
    }
    if read_time.is_some() && publish_date.is_some() {
        html.push_str("<span>•</span>");
    }
    if let Some(publish_date) = publish_date {
        let _ = write!(html, "<span>{}</span>", escape_html(publish_date));
    }
    html.push_str("</div></div></header>");

    html.push_str(r#"<article class="article-body"><div class="article-content">"#);
    if let Some(image) = data.featured_image.as_ref() {
        if let Some(src) = image.src.as_deref().filter(|v| !v.is_empty()) {
            let alt = image.alt.as_deref().filter(|v| !v.is_empty()).unwrap_or(article_title);
            let _ = write!(
                html,
                r#"<figure class="article-image"><img src="{}" alt="{}">"#,
                escape_html(src),
                escape_html(alt)
            );
            if let Some(caption) = image.caption.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(
                    html,
                    r#"<figcaption class="article-image-caption">{}</figcaption>"#,
                    escape_html(caption)
                );
            }
            html.push_str("</figure>");
        }
    }
    if let Some(quote) = data.pull_quote.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<blockquote class="pull-quote">"{}"</blockquote>"#,
            escape_html(quote)
        );
    }
    let _ = write!(
        html,
        r#"<div class="article-text" id="curatorial-body-content">{}</div>"#,
        markdown_to_html(&doc.body)
    );
    html.push_str("</div></article>");

    let curator = data.curator.unwrap_or_default();
    if let Some(name) = curator.name.as_deref().filter(|v| !v.is_empty()) {
        html.push_str(r#"<section class="curator-profile"><div class="curator-card">"#);
        html.push_str(r#"<div class="curator-label">ABOUT THE CURATOR</div>"#);
        let _ = write!(html, r#"<h3 class="curator-name">{}</h3>"#, escape_html(name));
        if let Some(title) = curator.title.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(html, r#"<p class="curator-title">{}</p>"#, escape_html(title));
        }
        html.push_str(r#"<div class="curator-divider"></div><div class="curator-links">"#);
        if let Some(website) = curator.website.as_deref().filter(|v| !v.is_empty()) {
            let display = website
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/');
            let _ = write!(
                html,
                r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="curator-link"><span class="curator-link-icon">🌐</span> {}</a>"#,
                escape_html(website),
                escape_html(display)
            );
        }
        if let Some(linkedin) = curator.linkedin.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(
                html,
                r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="curator-link"><span class="curator-link-icon">💼</span> LinkedIn</a>"#,
                escape_html(linkedin)
            );
        }
        html.push_str("</div></div></section>");
    }

    html.push_str(concat!(
        r#"<section class="back-cta"><div class="back-cta-content">"#,
        "<h2>Experience the Artwork</h2>",
        "<p>View full specifications, auction details, and exhibition information.</p>",
        r#"<a href="/" class="btn btn--primary">VIEW ARTWORK →</a>"#,
        "</div></section>"
    ));

    wrap_page(&html, &WrapOptions::page_class("preview-page--curatorial"))
}

fn render_press(doc: &PageDocument) -> String {
    let data: PressEntry = entry(doc);
    let hero = data.hero.unwrap_or_default();

    let mut html = String::from(r#"<header class="press-hero"><div class="container">"#);
    let _ = write!(
        html,
        r#"<p class="meta press-label">{}</p><h1 class="press-title">{}</h1>"#,
        escape_html(hero.label.as_deref().unwrap_or("PRESS & MEDIA")),
        escape_html(hero.title.as_deref().unwrap_or("Media Resources"))
    );
    if let Some(subtitle) = hero.subtitle.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="press-subtitle">{}</p>"#, escape_html(subtitle));
    }
    html.push_str("</div></header>");

    if !data.downloads.is_empty() {
        html.push_str(concat!(
            r#"<section class="section-downloads"><div class="container">"#,
            r#"<h2 class="section-title">Quick Downloads</h2><div class="download-grid">"#
        ));
        for file in &data.downloads {
            let icon = file.icon.as_deref().filter(|v| !v.is_empty()).unwrap_or("document");
            html.push_str(r#"<div class="download-card">"#);
            let _ = write!(
                html,
                r#"<div class="download-icon" data-icon="{}">{}</div>"#,
                escape_html(icon),
                crate::application::render::sections::download_icon(icon)
            );
            let _ = write!(
                html,
                r#"<span class="download-label">{}</span>"#,
                escape_html(file.label.as_deref().filter(|v| !v.is_empty()).unwrap_or("Download"))
            );
            if let Some(format) = file.format.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<span class="download-format">{}</span>"#, escape_html(format));
            }
            let _ = write!(
                html,
                r#"<a href="{}" class="btn btn--primary" download>DOWNLOAD</a></div>"#,
                escape_html(file.file.as_deref().filter(|v| !v.is_empty()).unwrap_or("#"))
            );
        }
        html.push_str("</div></div></section>");
    }

    let overview = data.overview.unwrap_or_default();
    let has_overview = overview.about_title.is_some() || !overview.about_text.is_empty();
    if has_overview || !data.key_facts.is_empty() {
        html.push_str(r#"<section class="section-about-facts"><div class="container"><div class="about-facts-grid">"#);
        if has_overview {
            html.push_str(r#"<div class="about-column">"#);
            if let Some(title) = overview.about_title.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<h2 class="section-title">{}</h2>"#, escape_html(title));
            }
            html.push_str(r#"<div class="about-text">"#);
            for paragraph in overview.about_text.iter().filter(|v| !v.is_empty()) {
                let _ = write!(html, "<p>{}</p>", escape_html(paragraph));
            }
            html.push_str("</div></div>");
        }
        if !data.key_facts.is_empty() {
            html.push_str(concat!(
                r#"<div class="facts-column"><div class="facts-card">"#,
                r#"<h3 class="facts-title">Key Facts</h3><dl class="facts-list">"#
            ));
            for fact in &data.key_facts {
                let Some(label) = fact.label.as_deref().filter(|v| !v.is_empty()) else {
                    continue;
                };
                let _ = write!(
                    html,
                    r#"<div class="fact-item"><dt class="fact-label">{}</dt><dd class="fact-value">{}</dd></div>"#,
                    escape_html(label),
                    escape_html(fact.value.as_deref().unwrap_or_default())
                );
            }
            html.push_str("</dl></div></div>");
        }
        html.push_str("</div></div></section>");
    }

    let gallery = data.gallery.unwrap_or_default();
    let images: Vec<_> = gallery
        .images
        .iter()
        .filter(|img| img.src.as_deref().is_some_and(|v| !v.is_empty()))
        .collect();
    if !images.is_empty() {
        html.push_str(r#"<section class="section-gallery"><div class="container">"#);
        if let Some(title) = gallery.title.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(html, r#"<h2 class="section-title">{}</h2>"#, escape_html(title));
        }
        if let Some(subtitle) = gallery.subtitle.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(html, r#"<p class="section-subtitle">{}</p>"#, escape_html(subtitle));
        }
        html.push_str(r#"<div class="gallery-grid columns-3">"#);
        for image in images {
            let _ = write!(
                html,
                r#"<figure class="gallery-item"><img src="{}" alt="{}" loading="lazy"><figcaption>"#,
                escape_html(image.src.as_deref().unwrap_or_default()),
                escape_html(image.alt.as_deref().unwrap_or_default())
            );
            if let Some(label) = image.label.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<span class="gallery-label">{}</span>"#, escape_html(label));
            }
            if let Some(dimensions) = image.dimensions.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<span class="gallery-caption">{}</span>"#, escape_html(dimensions));
            }
            html.push_str("</figcaption></figure>");
        }
        html.push_str("</div></div></section>");
    }

    let quote = data.curatorial_quote.unwrap_or_default();
    if let Some(text) = quote.text.as_deref().filter(|v| !v.is_empty()) {
        html.push_str(r#"<section class="section-quote"><div class="container"><blockquote class="quote-block">"#);
        let _ = write!(html, r#"<p class="quote-text">"{}"</p>"#, escape_html(text));
        if let Some(attribution) = quote.attribution.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(
                html,
                r#"<footer class="quote-footer"><cite class="quote-attribution">— {}</cite></footer>"#,
                escape_html(attribution)
            );
        }
        if let (Some(link), Some(link_text)) = (
            quote.link.as_deref().filter(|v| !v.is_empty()),
            quote.link_text.as_deref().filter(|v| !v.is_empty()),
        ) {
            let _ = write!(
                html,
                r#"<a href="{}" class="quote-link">{}</a>"#,
                escape_html(link),
                escape_html(link_text)
            );
        }
        html.push_str("</blockquote></div></section>");
    }

    let contact = data.contact.unwrap_or_default();
    html.push_str(r#"<section class="section-contact"><div class="container">"#);
    let _ = write!(
        html,
        r#"<h2 class="section-title">{}</h2><div class="contact-grid"><div class="contact-info">"#,
        escape_html(contact.title.as_deref().unwrap_or("Press Contact"))
    );
    let email = contact.email.as_deref().unwrap_or("press@zyborn.com");
    if !email.is_empty() {
        let escaped = escape_html(email);
        let _ = write!(html, r#"<a href="mailto:{escaped}" class="contact-email">{escaped}</a>"#);
    }
    if let Some(note) = contact.response_promise.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="contact-note">{}</p>"#, escape_html(note));
    }
    if let Some(phone) = contact.phone.as_deref().filter(|v| !v.is_empty()) {
        html.push_str(r#"<div class="contact-urgent">"#);
        if let Some(label) = contact.urgent_label.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(html, r#"<span class="urgent-label">{}</span>"#, escape_html(label));
        }
        let tel: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        let _ = write!(
            html,
            r#"<a href="tel:{}" class="contact-phone">{}</a></div>"#,
            escape_html(&tel),
            escape_html(phone)
        );
    }
    html.push_str("</div>");
    html.push_str(concat!(
        r#"<div class="contact-form-wrapper"><div class="contact-form-preview">"#,
        "<h3>Send a Press Inquiry</h3>",
        r#"<div class="form-row"><input type="text" placeholder="Your name" disabled><input type="email" placeholder="Email address" disabled></div>"#,
        r#"<div class="form-row"><input type="text" placeholder="Publication / Media outlet" disabled><select disabled><option>Select inquiry type...</option></select></div>"#,
        r#"<textarea placeholder="How can we help?" disabled></textarea>"#,
        r#"<button class="btn btn--primary" disabled>SEND INQUIRY</button>"#,
        "</div></div>"
    ));
    html.push_str("</div></div></section>");

    wrap_page(&html, &WrapOptions::page_class("preview-page--press"))
}

fn render_custom(doc: &PageDocument, now: DateTime<Utc>) -> String {
    let data: CustomPageEntry = entry(doc);
    let title = data.title.as_deref().unwrap_or("Custom Page");
    let layout = data.layout.as_deref().unwrap_or("default");

    let blocks = doc.sections();
    let content = if !blocks.is_empty() {
        render_blocks(&blocks, now)
    } else if !doc.body.trim().is_empty() {
        format!(
            r#"<article class="custom-page-content"><h1>{}</h1><div class="page-body">{}</div></article>"#,
            escape_html(title),
            markdown_to_html(&doc.body)
        )
    } else {
        format!(
            r#"<div class="preview-empty"><h1>{}</h1><p>Add sections or body content using the editor.</p></div>"#,
            escape_html(title)
        )
    };

    let options = WrapOptions {
        show_header: data.show_header != Some(false),
        show_footer: data.show_footer != Some(false),
        page_class: format!("preview-page--custom preview-page--layout-{layout}"),
    };
    wrap_page(&content, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap()
    }

    fn doc(kind: PageKind, raw: &str) -> PageDocument {
        PageDocument::from_markdown(kind, raw).unwrap()
    }

    #[test]
    fn home_renders_sections_in_order() {
        let raw = "---\nsections:\n  - type: hero\n    headline: First\n  - type: quote\n    text: Second\n---\n";
        let html = render_page(&doc(PageKind::Home, raw), now());
        let hero = html.find("First").unwrap();
        let quote = html.find("Second").unwrap();
        assert!(hero < quote);
        assert!(html.contains("preview-page--home"));
    }

    #[test]
    fn home_without_sections_shows_placeholder() {
        let html = render_page(&doc(PageKind::Home, "---\n---\n"), now());
        assert!(html.contains("No sections added yet."));
    }

    #[test]
    fn curatorial_renders_body_markdown_and_curator_card() {
        let raw = concat!(
            "---\narticle_title: On Permanence\nauthor: R. Voss\n",
            "curator:\n  name: R. Voss\n  website: https://voss.example/\n",
            "---\n## Essay\nSome **bold** prose"
        );
        let html = render_page(&doc(PageKind::Curatorial, raw), now());
        assert!(html.contains(r#"<h1 class="article-title">On Permanence</h1>"#));
        assert!(html.contains("<h2>Essay</h2>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("ABOUT THE CURATOR"));
        assert!(html.contains("voss.example"));
        assert!(html.contains("VIEW ARTWORK →"));
    }

    #[test]
    fn press_renders_downloads_facts_and_contact_defaults() {
        let raw = concat!(
            "---\ndownloads:\n  - label: Press Kit\n    icon: archive\n    format: ZIP\n",
            "key_facts:\n  - label: Edition\n    value: 1 of 21\n---\n"
        );
        let html = render_page(&doc(PageKind::Press, raw), now());
        assert!(html.contains("Quick Downloads"));
        assert!(html.contains("📦"));
        assert!(html.contains(r#"<dt class="fact-label">Edition</dt>"#));
        assert!(html.contains("mailto:press@zyborn.com"));
        assert!(html.contains("Send a Press Inquiry"));
    }

    #[test]
    fn custom_page_honors_chrome_toggles() {
        let raw = "---\ntitle: Visit\nshow_header: false\nshow_footer: false\n---\n";
        let html = render_page(&doc(PageKind::Custom, raw), now());
        assert!(!html.contains("<nav"));
        assert!(!html.contains("<footer"));
        assert!(html.contains("<h1>Visit</h1>"));
        assert!(html.contains("preview-page--layout-default"));
    }

    #[test]
    fn custom_page_without_sections_falls_back_to_the_body() {
        let raw = "---\ntitle: Visit Us\n---\nOur gallery is open **daily**.";
        let html = render_page(&doc(PageKind::Custom, raw), now());
        assert!(html.contains(r#"<article class="custom-page-content">"#));
        assert!(html.contains("<h1>Visit Us</h1>"));
        assert!(html.contains("open <strong>daily</strong>."));
        assert!(!html.contains("preview-empty"));
    }

    #[test]
    fn custom_page_with_sections_prefers_them_over_the_body() {
        let raw = "---\ntitle: Visit\nsections:\n  - type: quote\n    text: Hours\n---\nIgnored body";
        let html = render_page(&doc(PageKind::Custom, raw), now());
        assert!(html.contains("Hours"));
        assert!(!html.contains("Ignored body"));
    }

    #[test]
    fn custom_page_empty_state_names_both_sources() {
        let raw = "---\ntitle: Visit\n---\n";
        let html = render_page(&doc(PageKind::Custom, raw), now());
        assert!(html.contains("Add sections or body content using the editor."));
    }
}
