//! Section renderers: one HTML fragment builder per content-block kind.
//!
//! The markup mirrors the live site templates class-for-class so the editor
//! preview matches production. All editor text goes through
//! [`escape_html`]; the single exception is the custom-HTML block, which
//! injects its payload verbatim.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::application::render::html::escape_html;
use crate::application::render::markdown::markdown_to_html;
use crate::domain::blocks::*;

const ICON_CHECK: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="3" stroke-linecap="round" stroke-linejoin="round"><polyline points="20 6 9 17 4 12"></polyline></svg>"#;
const ICON_INSTAGRAM: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><rect x="2" y="2" width="20" height="20" rx="5" ry="5"></rect><path d="M16 11.37A4 4 0 1 1 12.63 8 4 4 0 0 1 16 11.37z"></path><line x1="17.5" y1="6.5" x2="17.51" y2="6.5"></line></svg>"#;
const ICON_TWITTER: &str = r#"<svg viewBox="0 0 24 24" fill="currentColor"><path d="M18.244 2.25h3.308l-7.227 8.26 8.502 11.24H16.17l-5.214-6.817L4.99 21.75H1.68l7.73-8.835L1.254 2.25H8.08l4.713 6.231zm-1.161 17.52h1.833L7.084 4.126H5.117z"/></svg>"#;
const ICON_TIKTOK: &str = r#"<svg viewBox="0 0 24 24" fill="currentColor"><path d="M19.59 6.69a4.83 4.83 0 0 1-3.77-4.25V2h-3.45v13.67a2.89 2.89 0 0 1-5.2 1.74 2.89 2.89 0 0 1 2.31-4.64 2.93 2.93 0 0 1 .88.13V9.4a6.84 6.84 0 0 0-1-.05A6.33 6.33 0 0 0 5 20.1a6.34 6.34 0 0 0 10.86-4.43v-7a8.16 8.16 0 0 0 4.77 1.52v-3.4a4.85 4.85 0 0 1-1-.1z"/></svg>"#;
const ICON_YOUTUBE: &str = r#"<svg viewBox="0 0 24 24" fill="currentColor"><path d="M23.498 6.186a3.016 3.016 0 0 0-2.122-2.136C19.505 3.545 12 3.545 12 3.545s-7.505 0-9.377.505A3.017 3.017 0 0 0 .502 6.186C0 8.07 0 12 0 12s0 3.93.502 5.814a3.016 3.016 0 0 0 2.122 2.136c1.871.505 9.376.505 9.376.505s7.505 0 9.377-.505a3.015 3.015 0 0 0 2.122-2.136C24 15.93 24 12 24 12s0-3.93-.502-5.814zM9.545 15.568V8.432L15.818 12l-6.273 3.568z"/></svg>"#;

/// Route one parsed block through its renderer. Total: unknown and
/// untyped blocks render an inline error strip instead of failing.
pub fn render_block(block: &ContentBlock, now: DateTime<Utc>) -> String {
    match block {
        ContentBlock::Known(section) => render_section(section, now),
        ContentBlock::Unknown { kind } => format!(
            r#"<div style="padding: 1rem; background: #ff4444; color: white; text-align: center;">Unknown section type: {}</div>"#,
            escape_html(kind)
        ),
        ContentBlock::Untyped => concat!(
            r#"<div style="padding: 1rem; background: #ff4444; color: white; text-align: center;">"#,
            "Unknown section (no type)</div>"
        )
        .to_string(),
    }
}

pub fn render_section(section: &Section, now: DateTime<Utc>) -> String {
    match section {
        Section::Hero(b) => render_hero(b),
        Section::Curator(b) => render_curator(b),
        Section::Artwork(b) => render_artwork(b),
        Section::Auction(b) => render_auction(b),
        Section::EmailCapture(b) => render_email_capture(b),
        Section::Charity(b) => render_charity(b),
        Section::Thanks(b) => render_thanks(b),
        Section::TextBlock(b) => render_text_block(b),
        Section::Gallery(b) => render_gallery(b),
        Section::Cta(b) => render_cta(b),
        Section::Video(b) => render_video(b),
        Section::Quote(b) => render_quote(b),
        Section::Stats(b) => render_stats(b),
        Section::Downloads(b) => render_downloads(b),
        Section::Spacer(b) => render_spacer(b),
        Section::Divider(b) => render_divider(b),
        Section::TwoColumn(b) => render_two_column(b),
        Section::FeatureGrid(b) => render_feature_grid(b),
        Section::Timeline(b) => render_timeline(b),
        Section::Team(b) => render_team(b),
        Section::LogoGrid(b) => render_logo_grid(b),
        Section::Map(b) => render_map(b),
        Section::ImageText(b) => render_image_text(b),
        Section::CustomHtml(b) => render_custom_html(b),
        Section::Accordion(b) => render_accordion(b),
        Section::Countdown(b) => render_countdown(b, now),
    }
}

/// Unique DOM id for fragments that carry an inline script.
fn generate_id() -> String {
    format!("preview-{}", Uuid::new_v4().simple())
}

static YOUTUBE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/(?:watch\?v=|embed/)|youtu\.be/)([a-zA-Z0-9_-]{11})")
        .expect("youtube pattern")
});
static VIMEO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"vimeo\.com/(\d+)").expect("vimeo pattern"));

/// Canonical embed URL for a pasted YouTube or Vimeo link. Anything else
/// passes through unchanged.
pub fn video_embed_url(url: &str) -> String {
    if let Some(captures) = YOUTUBE_RE.captures(url) {
        return format!("https://www.youtube.com/embed/{}", &captures[1]);
    }
    if let Some(captures) = VIMEO_RE.captures(url) {
        return format!("https://player.vimeo.com/video/{}", &captures[1]);
    }
    url.to_string()
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn or_default<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}

fn columns_or(value: &Option<TextValue>, fallback: &str) -> String {
    value
        .as_ref()
        .map(TextValue::text)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn render_hero(section: &HeroBlock) -> String {
    let mut html = String::from(r#"<section class="hero" id="hero"><div class="container hero-inner"><div class="hero-content">"#);

    if let Some(pre) = section.pre_headline.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="meta hero-label">{}</p>"#, escape_html(pre));
    }
    let _ = write!(
        html,
        r#"<h1 class="hero-title">{}</h1>"#,
        escape_html(or_default(&section.headline, "Headline"))
    );
    if let Some(sub) = section.subheadline.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="hero-subtitle">{}</p>"#, escape_html(sub));
    }

    let form = section.email_form.clone().unwrap_or_default();
    let show_form = form.show != Some(false) && section.show_form != Some(false);
    if show_form {
        html.push_str(r#"<div class="hero-form"><form>"#);
        let _ = write!(
            html,
            r#"<input type="email" class="form-input" placeholder="{}" disabled>"#,
            escape_html(or_default(&form.placeholder, "Enter your email"))
        );

        let interests: &[InterestOption] = if form.interests.is_empty() {
            &section.interests
        } else {
            &form.interests
        };
        let show_interests = form.show_interests != Some(false);
        if show_interests && (!interests.is_empty() || form.interests_label.is_some()) {
            html.push_str(r#"<select class="form-select" disabled>"#);
            let _ = write!(
                html,
                r#"<option value="">{}</option>"#,
                escape_html(or_default(&form.interests_label, "I am interested as..."))
            );
            for interest in interests {
                let option = interest.text();
                if !option.is_empty() {
                    let escaped = escape_html(option);
                    let _ = write!(html, r#"<option value="{escaped}">{escaped}</option>"#);
                }
            }
            html.push_str("</select>");
        }

        let _ = write!(
            html,
            r#"<button type="button" class="btn-primary" disabled>{}</button></form>"#,
            escape_html(or_default(&form.button_text, "Notify Me"))
        );
        if let Some(micro) = section.microcopy.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(html, r#"<p class="meta hero-microcopy">{}</p>"#, escape_html(micro));
        }
        html.push_str("</div>");
    }

    let cta = section.cta.clone().unwrap_or_default();
    let cta_text = cta.text.as_deref().or(section.cta_text.as_deref());
    let cta_link = cta.link.as_deref().or(section.cta_link.as_deref());
    if cta.show != Some(false) {
        if let Some(text) = cta_text.filter(|v| !v.is_empty()) {
            let _ = write!(
                html,
                r#"<div style="margin-top: 24px;"><a href="{}" class="btn-primary" style="font-size: 16px; padding: 18px 36px;">{} →</a></div>"#,
                escape_html(cta_link.filter(|v| !v.is_empty()).unwrap_or("#")),
                escape_html(text)
            );
        }
    }

    if section.show_social == Some(true) {
        html.push_str(r#"<div class="hero-social">"#);
        let _ = write!(html, r##"<a href="#" aria-label="Instagram">{ICON_INSTAGRAM}</a>"##);
        let _ = write!(html, r##"<a href="#" aria-label="X (Twitter)">{ICON_TWITTER}</a>"##);
        let _ = write!(html, r##"<a href="#" aria-label="TikTok">{ICON_TIKTOK}</a>"##);
        let _ = write!(html, r##"<a href="#" aria-label="YouTube">{ICON_YOUTUBE}</a>"##);
        html.push_str("</div>");
    }

    html.push_str("</div>");

    if let Some(image) = section.hero_image.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<div class="hero-image"><img src="{}" alt="{}"></div>"#,
            escape_html(image),
            escape_html(opt(&section.hero_image_alt))
        );
    }

    html.push_str("</div></section>");
    html
}

fn render_curator(section: &CuratorBlock) -> String {
    let mut html =
        String::from(r#"<section class="curator" id="curator"><div class="container"><div class="curator-card">"#);
    if let Some(label) = section.label.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="meta curator-label">{}</p>"#, escape_html(label));
    }
    if let Some(name) = section.name.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h3 class="curator-name">{}</h3>"#, escape_html(name));
    }
    if let Some(title) = section.essay_title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="curator-title">{}</h2>"#, escape_html(title));
    }
    if let Some(excerpt) = section.excerpt.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="curator-text">{}</p>"#, escape_html(excerpt));
    }
    if let Some(excerpt) = section.excerpt_2.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="curator-text">{}</p>"#, escape_html(excerpt));
    }
    if let Some(link) = section.read_more_link.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<a href="{}" class="btn-secondary btn-dark">{}</a>"#,
            escape_html(link),
            escape_html(or_default(&section.read_more_text, "Read More"))
        );
    }
    html.push_str("</div></div></section>");
    html
}

fn render_artwork(section: &ArtworkBlock) -> String {
    let mut html = String::from(concat!(
        r#"<section class="artwork" id="artwork"><div class="container">"#,
        r#"<div class="artwork-header"><p class="meta artwork-label">Artwork Details</p>"#,
        r#"<h2 class="artwork-title">Technical Specifications</h2></div>"#,
        r#"<div class="artwork-grid"><div class="artwork-specs">"#
    ));

    let specs = [
        ("Title", &section.title),
        ("Artist", &section.artist),
        ("Medium", &section.medium),
        ("Dimensions", &section.dimensions),
        ("Edition", &section.edition),
        ("Framing", &section.framing),
    ];
    for (label, value) in specs {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(
                html,
                r#"<div class="spec-row"><span class="meta spec-label">{label}</span><span class="spec-value">{}</span></div>"#,
                escape_html(value)
            );
        }
    }
    html.push_str("</div>");

    let items: Vec<&str> = section
        .inclusions
        .iter()
        .map(InclusionItem::text)
        .filter(|v| !v.is_empty())
        .collect();
    if !items.is_empty() {
        html.push_str(
            r#"<div class="artwork-inclusions"><h3>Included with purchase</h3><ul class="inclusion-list">"#,
        );
        for item in items {
            let _ = write!(html, "<li>{ICON_CHECK}<span>{}</span></li>", escape_html(item));
        }
        html.push_str("</ul></div>");
    }

    html.push_str("</div></div></section>");
    html
}

fn render_auction(section: &AuctionBlock) -> String {
    let mut html =
        String::from(r#"<section class="auction" id="auction"><div class="container"><div class="auction-inner">"#);
    if let Some(label) = section.label.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="meta auction-label">{}</p>"#, escape_html(label));
    }
    let _ = write!(
        html,
        r#"<h2 class="auction-title">{}</h2>"#,
        escape_html(or_default(&section.title, "Auction"))
    );
    if let Some(desc) = section.description.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="auction-desc">{}</p>"#, escape_html(desc));
    }

    html.push_str(r#"<div class="auction-info">"#);
    if let Some(date) = section.date.as_deref().filter(|v| !v.is_empty()) {
        html.push_str(r#"<div class="auction-item"><p class="meta auction-item-label">Date</p>"#);
        let _ = write!(html, r#"<p class="auction-item-value">{}</p>"#, escape_html(date));
        if let Some(sub) = section.date_sub.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(html, r#"<p class="auction-item-sub">{}</p>"#, escape_html(sub));
        }
        html.push_str("</div>");
    }
    if let Some(estimate) = section.estimate.as_deref().filter(|v| !v.is_empty()) {
        html.push_str(r#"<div class="auction-item"><p class="meta auction-item-label">Estimate</p>"#);
        let _ = write!(html, r#"<p class="auction-item-value">{}</p>"#, escape_html(estimate));
        if let Some(sub) = section.estimate_sub.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(html, r#"<p class="auction-item-sub">{}</p>"#, escape_html(sub));
        }
        html.push_str("</div>");
    }
    if let Some(format) = section.format.as_deref().filter(|v| !v.is_empty()) {
        html.push_str(r#"<div class="auction-item"><p class="meta auction-item-label">Format</p>"#);
        let _ = write!(html, r#"<p class="auction-item-value">{}</p></div>"#, escape_html(format));
    }
    html.push_str("</div>");

    if let Some(cta) = section.cta_text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<div class="auction-cta"><a href="{}" class="btn-primary">{}</a></div>"#,
            escape_html(or_default(&section.cta_link, "#")),
            escape_html(cta)
        );
    }
    if let Some(note) = section.note.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="auction-note">{}</p>"#, escape_html(note));
    }

    html.push_str("</div></div></section>");
    html
}

fn render_email_capture(section: &EmailCaptureBlock) -> String {
    let mut html = String::from(
        r#"<section class="email-capture"><div class="container"><div class="email-capture-card"><div class="email-left">"#,
    );
    if let Some(headline) = section.headline.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="email-left-headline">{}</h2>"#, escape_html(headline));
    }
    if let Some(text) = section.text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="email-left-text">{}</p>"#, escape_html(text));
    }
    html.push_str(r#"</div><div class="email-right">"#);
    if let Some(title) = section.form_title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, "<h2>{}</h2>", escape_html(title));
    }
    if let Some(subtitle) = section.form_subtitle.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="email-right-subtitle">{}</p>"#, escape_html(subtitle));
    }
    let _ = write!(
        html,
        concat!(
            r#"<div class="email-form"><input type="email" class="form-input" placeholder="Enter your email" disabled>"#,
            r#"<button type="button" class="btn-primary" disabled>{}</button></div>"#
        ),
        escape_html(or_default(&section.button_text, "Subscribe"))
    );
    html.push_str("</div></div></div></section>");
    html
}

fn render_charity(section: &CharityBlock) -> String {
    let mut html =
        String::from(r#"<section class="charity" id="charity"><div class="container"><div class="charity-inner">"#);
    if let Some(label) = section.label.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="meta charity-label">{}</p>"#, escape_html(label));
    }
    let _ = write!(
        html,
        r#"<h2 class="charity-title">{}</h2>"#,
        escape_html(or_default(&section.title, "Impact"))
    );
    if let Some(text) = section.text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<div class="charity-text">{}</div>"#, markdown_to_html(text));
    }
    html.push_str("</div></div></section>");
    html
}

fn render_thanks(section: &ThanksBlock) -> String {
    let mut html = String::from(r#"<section class="thanks"><div class="container">"#);
    if let Some(text) = section.text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, "<p>{}</p>", escape_html(text));
    }
    html.push_str("</div></section>");
    html
}

fn render_text_block(section: &TextBlockBlock) -> String {
    let background = or_default(&section.background, "default");
    let mut html = format!(
        r#"<section class="section-text-block text-block--{}"><div class="container">"#,
        escape_html(background)
    );
    if let Some(label) = section.label.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="meta section-label">{}</p>"#, escape_html(label));
    }
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="section-title">{}</h2>"#, escape_html(title));
    }
    if let Some(content) = section.content.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<div class="text-content">{}</div>"#, markdown_to_html(content));
    }
    html.push_str("</div></section>");
    html
}

fn render_gallery(section: &GalleryBlock) -> String {
    let columns = columns_or(&section.columns, "3");
    let mut html = String::from(r#"<section class="section-gallery"><div class="container">"#);
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="section-title">{}</h2>"#, escape_html(title));
    }
    if let Some(subtitle) = section.subtitle.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="section-subtitle">{}</p>"#, escape_html(subtitle));
    }

    let images: Vec<&GalleryImage> = section
        .images
        .iter()
        .filter(|img| img.src.as_deref().is_some_and(|v| !v.is_empty()))
        .collect();
    if !images.is_empty() {
        let _ = write!(html, r#"<div class="gallery-grid columns-{}">"#, escape_html(&columns));
        for image in images {
            html.push_str(r#"<figure class="gallery-item">"#);
            let _ = write!(
                html,
                r#"<img src="{}" alt="{}">"#,
                escape_html(opt(&image.src)),
                escape_html(opt(&image.alt))
            );
            if let Some(caption) = image.caption.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(
                    html,
                    r#"<figcaption><span class="gallery-caption">{}</span></figcaption>"#,
                    escape_html(caption)
                );
            }
            html.push_str("</figure>");
        }
        html.push_str("</div>");
    } else {
        html.push_str(
            r#"<div style="padding: 2rem; text-align: center; color: #666;">[Add images to gallery]</div>"#,
        );
    }

    html.push_str("</div></section>");
    html
}

fn render_cta(section: &CtaBlock) -> String {
    let mut html = String::from(
        r#"<section class="section-cta" style="background: var(--color-black); padding: 80px 0; text-align: center;"><div class="container">"#,
    );
    if let Some(headline) = section.headline.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<h2 class="section-title" style="color: var(--color-white);">{}</h2>"#,
            escape_html(headline)
        );
    }
    if let Some(text) = section.text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<p style="color: var(--color-steel-300); margin-bottom: 2rem;">{}</p>"#,
            escape_html(text)
        );
    }
    if let Some(button) = section.button_text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<a href="{}" class="btn-primary">{}</a>"#,
            escape_html(or_default(&section.button_link, "#")),
            escape_html(button)
        );
    }
    if let Some(note) = section.note.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<p style="color: var(--color-steel-600); margin-top: 1rem; font-size: 14px;">{}</p>"#,
            escape_html(note)
        );
    }
    html.push_str("</div></section>");
    html
}

fn render_video(section: &VideoBlock) -> String {
    let embed_url = section
        .video_url
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(video_embed_url);
    let mut html = String::from(r#"<section class="section-video"><div class="container">"#);
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<h2 class="section-title" style="color: var(--color-white); text-align: center;">{}</h2>"#,
            escape_html(title)
        );
    }
    html.push_str(r#"<div class="video-wrapper aspect-16-9">"#);
    match embed_url {
        Some(url) => {
            let _ = write!(
                html,
                r#"<iframe src="{}" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe>"#,
                escape_html(&url)
            );
        }
        None => html.push_str(
            r#"<div style="position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #666;">[Enter a YouTube or Vimeo URL]</div>"#,
        ),
    }
    html.push_str("</div>");
    if let Some(caption) = section.caption.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="video-caption">{}</p>"#, escape_html(caption));
    }
    html.push_str("</div></section>");
    html
}

fn render_quote(section: &QuoteBlock) -> String {
    let mut html =
        String::from(r#"<section class="section-quote"><div class="container"><div class="quote-block">"#);
    let _ = write!(
        html,
        r#"<p class="quote-text">"{}"</p>"#,
        escape_html(or_default(&section.text, "Quote text here..."))
    );
    html.push_str(r#"<div class="quote-footer">"#);
    if let Some(attribution) = section.attribution.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<cite class="quote-attribution">{}</cite>"#, escape_html(attribution));
    }
    if let Some(title) = section.attribution_title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<span class="quote-title">{}</span>"#, escape_html(title));
    }
    html.push_str("</div></div></div></section>");
    html
}

fn render_stats(section: &StatsBlock) -> String {
    let style = or_default(&section.style, "default");
    let columns = columns_or(&section.columns, "3");
    let mut html = format!(
        r#"<section class="section-stats stats--{}"><div class="container">"#,
        escape_html(style)
    );
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<h2 class="section-title" style="text-align: center;">{}</h2>"#,
            escape_html(title)
        );
    }
    if !section.items.is_empty() {
        let _ = write!(html, r#"<div class="stats-grid columns-{}">"#, escape_html(&columns));
        for item in &section.items {
            let _ = write!(
                html,
                concat!(
                    r#"<div class="stat-item"><span class="stat-value">{}</span>"#,
                    r#"<span class="meta stat-label">{}</span></div>"#
                ),
                escape_html(or_default(&item.value, "0")),
                escape_html(or_default(&item.label, "Label"))
            );
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
    html
}

pub fn download_icon(icon: &str) -> &'static str {
    match icon {
        "image" => "🖼️",
        "archive" => "📦",
        "video" => "🎬",
        "folder" => "📁",
        _ => "📄",
    }
}

fn render_downloads(section: &DownloadsBlock) -> String {
    let mut html = String::from(r#"<section class="section-downloads"><div class="container">"#);
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="section-title">{}</h2>"#, escape_html(title));
    }

    let files: Vec<&DownloadFile> = section
        .files
        .iter()
        .filter(|f| f.label.as_deref().is_some_and(|v| !v.is_empty()))
        .collect();
    if !files.is_empty() {
        html.push_str(r#"<ul class="download-list">"#);
        for file in files {
            html.push_str(r#"<li class="download-item">"#);
            let _ = write!(
                html,
                r#"<div class="download-icon">{}</div><div class="download-info">"#,
                download_icon(or_default(&file.icon, "document"))
            );
            let _ = write!(
                html,
                r#"<a href="{}" class="download-label" target="_blank">{}</a>"#,
                escape_html(or_default(&file.file, "#")),
                escape_html(opt(&file.label))
            );
            if let Some(description) = file.description.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(
                    html,
                    r#"<span class="download-description">{}</span>"#,
                    escape_html(description)
                );
            }
            if let Some(format) = file.format.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<span class="download-format">{}</span>"#, escape_html(format));
            }
            html.push_str("</div></li>");
        }
        html.push_str("</ul>");
    } else {
        html.push_str(
            r#"<div style="padding: 2rem; text-align: center; color: #666;">[Add downloadable files]</div>"#,
        );
    }

    html.push_str("</div></section>");
    html
}

fn render_spacer(section: &SpacerBlock) -> String {
    format!(
        r#"<div class="spacer spacer--{}"></div>"#,
        escape_html(or_default(&section.size, "medium"))
    )
}

fn render_divider(section: &DividerBlock) -> String {
    format!(
        r#"<div class="section-divider style-{} width-{} spacing-{}"><hr class="divider-line"></div>"#,
        escape_html(or_default(&section.style, "line")),
        escape_html(or_default(&section.width, "medium")),
        escape_html(or_default(&section.spacing, "medium"))
    )
}

fn render_column(html: &mut String, column: &Option<ColumnContent>) {
    let column = column.clone().unwrap_or_default();
    if column.kind.as_deref() == Some("image") {
        if let Some(image) = column.image.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(
                html,
                r#"<img src="{}" alt="{}" class="split-image">"#,
                escape_html(image),
                escape_html(opt(&column.image_alt))
            );
            return;
        }
    }
    if let Some(text) = column.text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<div class="split-content">{}</div>"#, markdown_to_html(text));
    }
}

fn render_two_column(section: &TwoColumnBlock) -> String {
    let background = or_default(&section.background, "default");
    let background_var = if background == "light" { "steel-100" } else { "black" };
    let mut html = format!(
        r#"<section class="section-split" style="background: var(--color-{background_var}); padding: 80px 0;"><div class="container">"#
    );
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<h2 class="section-title" style="margin-bottom: 2rem;">{}</h2>"#,
            escape_html(title)
        );
    }
    html.push_str(r#"<div class="split-container"><div class="split-left">"#);
    render_column(&mut html, &section.left);
    html.push_str(r#"</div><div class="split-right">"#);
    render_column(&mut html, &section.right);
    html.push_str("</div></div></div></section>");
    html
}

fn render_feature_grid(section: &FeatureGridBlock) -> String {
    let columns = columns_or(&section.columns, "3");
    let mut html =
        String::from(r#"<section class="section-feature-grid" style="padding: 80px 0;"><div class="container">"#);
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="section-title">{}</h2>"#, escape_html(title));
    }
    if let Some(subtitle) = section.subtitle.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="section-subtitle">{}</p>"#, escape_html(subtitle));
    }
    if !section.features.is_empty() {
        let _ = write!(html, r#"<div class="feature-grid columns-{}">"#, escape_html(&columns));
        for feature in &section.features {
            html.push_str(r#"<div class="feature-card">"#);
            if let Some(icon) = feature.icon.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<span class="feature-icon">{}</span>"#, escape_html(icon));
            }
            let _ = write!(
                html,
                r#"<h3 class="feature-title">{}</h3><p class="feature-description">{}</p>"#,
                escape_html(opt(&feature.title)),
                escape_html(opt(&feature.description))
            );
            if let Some(link) = feature.link.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(
                    html,
                    r#"<a href="{}" class="feature-link">Learn more →</a>"#,
                    escape_html(link)
                );
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
    html
}

fn render_timeline(section: &TimelineBlock) -> String {
    let layout = or_default(&section.layout, "vertical");
    let mut html = format!(
        r#"<section class="section-timeline layout-{}" style="padding: 80px 0;"><div class="container">"#,
        escape_html(layout)
    );
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="section-title">{}</h2>"#, escape_html(title));
    }
    if !section.events.is_empty() {
        html.push_str(r#"<div class="timeline">"#);
        for event in &section.events {
            html.push_str(
                r#"<div class="timeline-item is-visible"><div class="timeline-marker"></div><div class="timeline-content">"#,
            );
            if let Some(date) = event.date.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<span class="timeline-date">{}</span>"#, escape_html(date));
            }
            let _ = write!(html, r#"<h3 class="timeline-title">{}</h3>"#, escape_html(opt(&event.title)));
            if let Some(description) = event.description.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(
                    html,
                    r#"<p class="timeline-description">{}</p>"#,
                    escape_html(description)
                );
            }
            if let Some(image) = event.image.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<img src="{}" alt="">"#, escape_html(image));
            }
            html.push_str("</div></div>");
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
    html
}

fn render_team(section: &TeamBlock) -> String {
    let columns = columns_or(&section.columns, "3");
    let mut html =
        String::from(r#"<section class="section-team" style="padding: 80px 0;"><div class="container">"#);
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="section-title">{}</h2>"#, escape_html(title));
    }
    if let Some(subtitle) = section.subtitle.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<p class="section-subtitle">{}</p>"#, escape_html(subtitle));
    }
    if !section.people.is_empty() {
        let _ = write!(html, r#"<div class="team-grid columns-{}">"#, escape_html(&columns));
        for person in &section.people {
            html.push_str(r#"<div class="team-card">"#);
            match person.photo.as_deref().filter(|v| !v.is_empty()) {
                Some(photo) => {
                    let _ = write!(
                        html,
                        r#"<img src="{}" alt="{}" class="team-photo">"#,
                        escape_html(photo),
                        escape_html(opt(&person.name))
                    );
                }
                None => html.push_str(r#"<div class="team-photo-placeholder"></div>"#),
            }
            let _ = write!(html, r#"<h3 class="team-name">{}</h3>"#, escape_html(opt(&person.name)));
            if let Some(role) = person.role.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<p class="team-role">{}</p>"#, escape_html(role));
            }
            if let Some(bio) = person.bio.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(html, r#"<p class="team-bio">{}</p>"#, escape_html(bio));
            }
            let website = person.website.as_deref().filter(|v| !v.is_empty());
            let linkedin = person.linkedin.as_deref().filter(|v| !v.is_empty());
            if website.is_some() || linkedin.is_some() {
                html.push_str(r#"<div class="team-links">"#);
                if let Some(url) = website {
                    let _ = write!(html, r#"<a href="{}" target="_blank">Website</a>"#, escape_html(url));
                }
                if let Some(url) = linkedin {
                    let _ = write!(html, r#"<a href="{}" target="_blank">LinkedIn</a>"#, escape_html(url));
                }
                html.push_str("</div>");
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
    html
}

fn render_logo_grid(section: &LogoGridBlock) -> String {
    let columns = columns_or(&section.columns, "4");
    let grayscale = section.grayscale != Some(false);
    let mut html = format!(
        r#"<section class="section-logo-grid{}" style="padding: 80px 0;"><div class="container">"#,
        if grayscale { " grayscale" } else { "" }
    );
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<h2 class="section-title" style="text-align: center;">{}</h2>"#,
            escape_html(title)
        );
    }
    if let Some(subtitle) = section.subtitle.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<p class="section-subtitle" style="text-align: center;">{}</p>"#,
            escape_html(subtitle)
        );
    }
    if !section.logos.is_empty() {
        let _ = write!(html, r#"<div class="logo-grid columns-{}">"#, escape_html(&columns));
        for logo in &section.logos {
            html.push_str(r#"<div class="logo-item">"#);
            let link = logo.link.as_deref().filter(|v| !v.is_empty());
            if let Some(url) = link {
                let _ = write!(
                    html,
                    r#"<a href="{}" target="_blank" title="{}">"#,
                    escape_html(url),
                    escape_html(opt(&logo.name))
                );
            }
            let _ = write!(
                html,
                r#"<img src="{}" alt="{}">"#,
                escape_html(opt(&logo.logo)),
                escape_html(opt(&logo.name))
            );
            if link.is_some() {
                html.push_str("</a>");
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
    html
}

fn render_map(section: &MapBlock) -> String {
    let mut html =
        String::from(r#"<section class="section-map" style="padding: 80px 0;"><div class="container">"#);
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="section-title">{}</h2>"#, escape_html(title));
    }
    html.push_str(r#"<div class="map-wrapper"><div class="map-embed">"#);
    match section.embed_url.as_deref().filter(|v| !v.is_empty()) {
        Some(url) => {
            let _ = write!(
                html,
                r#"<iframe src="{}" width="100%" height="400" style="border:0;" allowfullscreen="" loading="lazy"></iframe>"#,
                escape_html(url)
            );
        }
        None => html.push_str(
            r#"<div style="height: 400px; background: #333; display: flex; align-items: center; justify-content: center; color: #666;">[Enter Google Maps embed URL]</div>"#,
        ),
    }
    html.push_str(r#"</div><div class="map-info">"#);
    if let Some(venue) = section.venue.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h3 class="venue-name">{}</h3>"#, escape_html(venue));
    }
    if let Some(address) = section.address.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<p class="venue-address">{}</p>"#,
            escape_html(address).replace('\n', "<br>")
        );
    }
    if let Some(link) = section.directions_link.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<a href="{}" target="_blank" class="directions-link">Get Directions →</a>"#,
            escape_html(link)
        );
    }
    if let Some(info) = section.info.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<div class="venue-info">{}</div>"#, markdown_to_html(info));
    }
    html.push_str("</div></div></div></section>");
    html
}

fn render_image_text(section: &ImageTextBlock) -> String {
    let position = or_default(&section.text_position, "overlay");
    let align = or_default(&section.text_align, "left");
    let mut html = format!(
        r#"<section class="section-image-text position-{} align-{}">"#,
        escape_html(position),
        escape_html(align)
    );
    if let Some(image) = section.image.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<img src="{}" alt="{}" class="section-image">"#,
            escape_html(image),
            escape_html(opt(&section.image_alt))
        );
    }
    let overlay_style = if position == "overlay" {
        "position: absolute; bottom: 0; left: 0; right: 0; padding: 3rem; background: linear-gradient(transparent, rgba(0,0,0,0.9));"
    } else {
        "padding: 2rem 0;"
    };
    let _ = write!(html, r#"<div class="text-content" style="{overlay_style}">"#);
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, "<h2>{}</h2>", escape_html(title));
    }
    if let Some(text) = section.text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, "<div>{}</div>", markdown_to_html(text));
    }
    if let Some(cta) = section.cta_text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<a href="{}" class="btn-primary">{}</a>"#,
            escape_html(or_default(&section.cta_link, "#")),
            escape_html(cta)
        );
    }
    html.push_str("</div></section>");
    html
}

// Raw injection by contract: this block exists so trusted editors can
// drop bespoke markup into a page.
fn render_custom_html(section: &CustomHtmlBlock) -> String {
    let mut html = String::from(r#"<section class="section-custom">"#);
    if let Some(css) = section.css.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, "<style>{css}</style>");
    }
    html.push_str(r#"<div class="container">"#);
    match section.html.as_deref().filter(|v| !v.is_empty()) {
        Some(body) => html.push_str(body),
        None => html.push_str(
            r#"<div style="padding: 2rem; text-align: center; color: #666;">[Add custom HTML content]</div>"#,
        ),
    }
    html.push_str("</div></section>");
    html
}

fn render_accordion(section: &AccordionBlock) -> String {
    let accordion_id = generate_id();
    let expand_first = section.expand_first != Some(false);

    let mut html = String::from(r#"<section class="accordion-section"><div class="accordion-section__container">"#);
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="accordion-section__title">{}</h2>"#, escape_html(title));
    }
    if let Some(subtitle) = section.subtitle.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<p class="accordion-section__subtitle">{}</p>"#,
            escape_html(subtitle)
        );
    }

    if !section.items.is_empty() {
        let _ = write!(html, r#"<div class="accordion" id="{accordion_id}">"#);
        for (index, item) in section.items.iter().enumerate() {
            let is_open = expand_first && index == 0;
            let item_id = format!("{accordion_id}-item-{index}");
            let _ = write!(
                html,
                r#"<div class="accordion__item{}" data-accordion-item>"#,
                if is_open { " accordion__item--open" } else { "" }
            );
            let _ = write!(
                html,
                concat!(
                    r#"<button class="accordion__header" data-accordion-toggle="{}">"#,
                    r#"<span class="accordion__question">{}</span>"#,
                    r#"<span class="accordion__icon">{}</span></button>"#
                ),
                item_id,
                escape_html(or_default(&item.question, "Question")),
                if is_open { "−" } else { "+" }
            );
            let _ = write!(
                html,
                r#"<div class="accordion__content" id="{}" style="{}"><div class="accordion__answer">{}</div></div></div>"#,
                item_id,
                if is_open { "" } else { "display: none;" },
                markdown_to_html(opt(&item.answer))
            );
        }
        html.push_str("</div>");

        // Toggle behavior ships with the fragment so the preview pane
        // stays interactive without a separate asset.
        let _ = write!(
            html,
            concat!(
                "<script>(function(){{",
                r#"var acc = document.getElementById("{id}");"#,
                "if(!acc) return;",
                r#"acc.addEventListener("click", function(e){{"#,
                r#"var toggle = e.target.closest("[data-accordion-toggle]");"#,
                "if(!toggle) return;",
                r#"var item = toggle.closest("[data-accordion-item]");"#,
                r#"var content = item.querySelector(".accordion__content");"#,
                r#"var icon = toggle.querySelector(".accordion__icon");"#,
                r#"var isOpen = item.classList.contains("accordion__item--open");"#,
                "if(isOpen){{",
                r#"item.classList.remove("accordion__item--open");"#,
                r#"content.style.display = "none";"#,
                r#"icon.textContent = "+";"#,
                "}} else {{",
                r#"item.classList.add("accordion__item--open");"#,
                r#"content.style.display = "block";"#,
                r#"icon.textContent = "−";"#,
                "}}}});}})();</script>"
            ),
            id = accordion_id
        );
    } else {
        html.push_str(r#"<div class="accordion__empty">[Add FAQ items]</div>"#);
    }

    html.push_str("</div></section>");
    html
}

/// Remaining time split into display units.
struct CountdownParts {
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
}

fn parse_target_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn countdown_parts(target: DateTime<Utc>, now: DateTime<Utc>) -> Option<CountdownParts> {
    let remaining = (target - now).num_seconds();
    if remaining <= 0 {
        return None;
    }
    Some(CountdownParts {
        days: remaining / 86_400,
        hours: (remaining % 86_400) / 3_600,
        minutes: (remaining % 3_600) / 60,
        seconds: remaining % 60,
    })
}

fn render_countdown(section: &CountdownBlock, now: DateTime<Utc>) -> String {
    let countdown_id = generate_id();
    let style = or_default(&section.style, "default");
    let target_raw = opt(&section.target_date);
    let expired_message = or_default(&section.expired_message, "Event has started!");

    // The script keeps the timer ticking in the browser; the initial
    // values are computed here so the fragment is correct even before
    // any script runs.
    let target = parse_target_date(target_raw);
    let parts = target.and_then(|t| countdown_parts(t, now));
    let expired = target.is_some() && parts.is_none();

    let mut html = format!(
        r#"<section class="countdown-section countdown-section--{}"><div class="countdown-section__container">"#,
        escape_html(style)
    );
    if let Some(title) = section.title.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(html, r#"<h2 class="countdown-section__title">{}</h2>"#, escape_html(title));
    }

    let (days, hours, minutes, seconds) = match &parts {
        Some(p) => (
            p.days.to_string(),
            format!("{:02}", p.hours),
            format!("{:02}", p.minutes),
            format!("{:02}", p.seconds),
        ),
        None => ("--".into(), "--".into(), "--".into(), "--".into()),
    };
    let _ = write!(
        html,
        concat!(
            r#"<div class="countdown" id="{id}" data-target="{target}" data-expired="{expired}"{hidden}>"#,
            r#"<div class="countdown__unit"><span class="countdown__value" data-days>{days}</span><span class="countdown__label">Days</span></div>"#,
            r#"<div class="countdown__unit"><span class="countdown__value" data-hours>{hours}</span><span class="countdown__label">Hours</span></div>"#,
            r#"<div class="countdown__unit"><span class="countdown__value" data-minutes>{minutes}</span><span class="countdown__label">Minutes</span></div>"#,
            r#"<div class="countdown__unit"><span class="countdown__value" data-seconds>{seconds}</span><span class="countdown__label">Seconds</span></div>"#,
            "</div>"
        ),
        id = countdown_id,
        target = escape_html(target_raw),
        expired = escape_html(expired_message),
        hidden = if expired { r#" style="display: none;""# } else { "" },
        days = days,
        hours = hours,
        minutes = minutes,
        seconds = seconds,
    );

    let _ = write!(
        html,
        r#"<div class="countdown__expired" id="{}-expired" style="{}">{}</div>"#,
        countdown_id,
        if expired { "" } else { "display: none;" },
        escape_html(expired_message)
    );

    if let Some(cta) = section.cta_text.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(
            html,
            r#"<div class="countdown__cta"><a href="{}" class="btn btn--primary">{}</a></div>"#,
            escape_html(or_default(&section.cta_link, "#")),
            escape_html(cta)
        );
    }

    let _ = write!(
        html,
        concat!(
            "<script>(function(){{",
            r#"var el = document.getElementById("{id}");"#,
            "if(!el) return;",
            r#"var target = new Date(el.getAttribute("data-target")).getTime();"#,
            r#"var expiredEl = document.getElementById("{id}-expired");"#,
            "function update(){{",
            "var now = new Date().getTime();",
            "var diff = target - now;",
            "if(diff <= 0){{",
            r#"el.style.display = "none";"#,
            r#"if(expiredEl) expiredEl.style.display = "block";"#,
            "return;",
            "}}",
            "var days = Math.floor(diff / (1000 * 60 * 60 * 24));",
            "var hours = Math.floor((diff % (1000 * 60 * 60 * 24)) / (1000 * 60 * 60));",
            "var mins = Math.floor((diff % (1000 * 60 * 60)) / (1000 * 60));",
            "var secs = Math.floor((diff % (1000 * 60)) / 1000);",
            r#"var dEl = el.querySelector("[data-days]");"#,
            r#"var hEl = el.querySelector("[data-hours]");"#,
            r#"var mEl = el.querySelector("[data-minutes]");"#,
            r#"var sEl = el.querySelector("[data-seconds]");"#,
            "if(dEl) dEl.textContent = days;",
            r#"if(hEl) hEl.textContent = hours < 10 ? "0" + hours : hours;"#,
            r#"if(mEl) mEl.textContent = mins < 10 ? "0" + mins : mins;"#,
            r#"if(sEl) sEl.textContent = secs < 10 ? "0" + secs : secs;"#,
            "}}",
            "update();",
            "setInterval(update, 1000);",
            "}})();</script>"
        ),
        id = countdown_id
    );

    html.push_str("</div></section>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    use crate::domain::blocks::ContentBlock;

    fn at(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    }

    fn render(value: serde_json::Value) -> String {
        let block = ContentBlock::from_value(&value);
        render_block(&block, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn every_known_kind_renders_non_empty() {
        for kind in KNOWN_KINDS {
            let html = render(json!({ "type": kind }));
            assert!(!html.is_empty(), "kind `{kind}` rendered empty");
            assert!(
                !html.contains("Unknown section"),
                "kind `{kind}` fell through the router"
            );
        }
    }

    #[test]
    fn unknown_kind_renders_error_strip_escaped() {
        let html = render(json!({ "type": "<bad>" }));
        assert!(html.contains("Unknown section type: &lt;bad&gt;"));
    }

    #[test]
    fn hero_escapes_editor_text() {
        let html = render(json!({
            "type": "hero",
            "headline": "<script>alert(1)</script>",
        }));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn hero_form_hidden_when_disabled() {
        let html = render(json!({ "type": "hero", "show_form": false }));
        assert!(!html.contains("hero-form"));
        let html = render(json!({ "type": "hero" }));
        assert!(html.contains("hero-form"));
    }

    #[test]
    fn gallery_placeholder_without_images() {
        let html = render(json!({ "type": "gallery" }));
        assert!(html.contains("[Add images to gallery]"));
        let html = render(json!({
            "type": "gallery",
            "columns": "2",
            "images": [{ "src": "/images/a.png", "caption": "One" }],
        }));
        assert!(html.contains("gallery-grid columns-2"));
        assert!(html.contains(r#"<img src="/images/a.png" alt="">"#));
    }

    #[test]
    fn video_embeds_youtube_and_vimeo() {
        let html = render(json!({
            "type": "video",
            "video_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        }));
        assert!(html.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));

        let html = render(json!({ "type": "video", "video_url": "https://vimeo.com/123456" }));
        assert!(html.contains("https://player.vimeo.com/video/123456"));

        let html = render(json!({ "type": "video" }));
        assert!(html.contains("[Enter a YouTube or Vimeo URL]"));
    }

    #[test]
    fn youtube_short_links_resolve() {
        assert_eq!(
            video_embed_url("https://youtu.be/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(video_embed_url("https://example.com/v.mp4"), "https://example.com/v.mp4");
    }

    #[test]
    fn custom_html_is_injected_verbatim() {
        let html = render(json!({
            "type": "custom_html",
            "css": ".x { color: red; }",
            "html": "<marquee>hi</marquee>",
        }));
        assert!(html.contains("<style>.x { color: red; }</style>"));
        assert!(html.contains("<marquee>hi</marquee>"));
    }

    #[test]
    fn accordion_opens_first_item_and_ships_script() {
        let html = render(json!({
            "type": "accordion",
            "items": [
                { "question": "Q1", "answer": "A1" },
                { "question": "Q2", "answer": "A2" },
            ],
        }));
        // The toggle script mentions the class too, so count markup only.
        let markup = html.split("<script>").next().unwrap();
        assert_eq!(markup.matches("accordion__item--open").count(), 1);
        assert!(html.contains("<script>"));
        let closed = render(json!({
            "type": "accordion",
            "expand_first": false,
            "items": [{ "question": "Q1", "answer": "A1" }],
        }));
        let closed_markup = closed.split("<script>").next().unwrap();
        assert!(!closed_markup.contains("accordion__item--open"));
    }

    #[test]
    fn countdown_future_target_has_initial_values() {
        let block = ContentBlock::from_value(&json!({
            "type": "countdown",
            "target_date": "2025-12-24T18:00:00Z",
        }));
        let html = render_block(&block, at("2025-12-22T17:59:58Z"));
        assert!(html.contains(r#"<span class="countdown__value" data-days>2</span>"#));
        assert!(html.contains(r#"<span class="countdown__value" data-hours>00</span>"#));
        assert!(html.contains(r#"<span class="countdown__value" data-seconds>02</span>"#));
        assert!(html.contains("<script>"));
    }

    #[test]
    fn countdown_past_target_shows_expired_message() {
        let block = ContentBlock::from_value(&json!({
            "type": "countdown",
            "target_date": "2025-12-24T18:00:00Z",
            "expired_message": "Bidding is open",
        }));
        let html = render_block(&block, at("2026-01-01T00:00:00Z"));
        assert!(html.contains(r#"<div class="countdown" id="#));
        assert!(html.contains(r#"data-expired="Bidding is open" style="display: none;">"#));
        assert!(html.contains(">Bidding is open</div>"));
    }

    #[test]
    fn countdown_without_target_keeps_placeholders() {
        let html = render(json!({ "type": "countdown" }));
        assert!(html.contains(r#"data-days>--<"#));
        assert!(!html.contains(r#"data-expired="Event has started!" style="display: none;""#));
    }

    #[test]
    fn spacer_and_divider_are_single_elements() {
        assert_eq!(render(json!({ "type": "spacer" })), r#"<div class="spacer spacer--medium"></div>"#);
        assert_eq!(
            render(json!({ "type": "divider", "style": "dots", "width": "full" })),
            r#"<div class="section-divider style-dots width-full spacing-medium"><hr class="divider-line"></div>"#
        );
    }

    #[test]
    fn two_column_renders_image_and_markdown_sides() {
        let html = render(json!({
            "type": "two_column",
            "background": "light",
            "left": { "type": "image", "image": "/images/left.png" },
            "right": { "text": "**bold** copy" },
        }));
        assert!(html.contains("var(--color-steel-100)"));
        assert!(html.contains(r#"<img src="/images/left.png" alt="" class="split-image">"#));
        assert!(html.contains("<strong>bold</strong> copy"));
    }
}
