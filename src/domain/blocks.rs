//! Content blocks: the typed units a page is assembled from.
//!
//! Every editable section the CMS can emit is one variant of [`Section`].
//! The union is closed on purpose: adding a section kind means adding a
//! variant here and a renderer arm next to the others, and the compiler
//! points at every match that needs updating. Entries arriving from the
//! editor are free-form JSON/YAML, so parsing is total — a record whose
//! `type` tag is not recognized becomes [`ContentBlock::Unknown`] and a
//! record without a tag becomes [`ContentBlock::Untyped`]; neither aborts
//! rendering of the rest of the page.

use serde::Deserialize;
use serde_json::Value;

/// One parsed content-block record.
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Known(Box<Section>),
    Unknown { kind: String },
    Untyped,
}

impl ContentBlock {
    /// Parse a raw editor record. Never fails: a record without a tag
    /// degrades to `Untyped`, an unrecognized tag to `Unknown`, and a known
    /// tag with malformed sub-fields keeps the fields that parse.
    pub fn from_value(value: &Value) -> Self {
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Self::Untyped;
        };
        if !KNOWN_KINDS.contains(&kind) {
            return Self::Unknown {
                kind: kind.to_string(),
            };
        }
        match serde_json::from_value::<Section>(value.clone()) {
            Ok(section) => Self::Known(Box::new(section)),
            Err(_) => match salvage_fields(kind, value) {
                Some(section) => Self::Known(Box::new(section)),
                None => Self::Unknown {
                    kind: kind.to_string(),
                },
            },
        }
    }
}

/// Rebuild a known-kind record keeping only the sub-fields that parse on
/// their own, so one malformed value cannot take the whole section down.
/// Every block field is optional and defaulted, which makes single-field
/// probing sound.
fn salvage_fields(kind: &str, value: &Value) -> Option<Section> {
    let tag = ("type".to_string(), Value::String(kind.to_string()));
    let mut clean = serde_json::Map::new();
    clean.insert(tag.0.clone(), tag.1.clone());
    if let Some(fields) = value.as_object() {
        for (name, field) in fields {
            if name == "type" {
                continue;
            }
            let mut candidate = serde_json::Map::new();
            candidate.insert(tag.0.clone(), tag.1.clone());
            candidate.insert(name.clone(), field.clone());
            if serde_json::from_value::<Section>(Value::Object(candidate)).is_ok() {
                clean.insert(name.clone(), field.clone());
            }
        }
    }
    serde_json::from_value(Value::Object(clean)).ok()
}

/// The 26 known section kinds, tagged by the CMS `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Hero(HeroBlock),
    Curator(CuratorBlock),
    Artwork(ArtworkBlock),
    Auction(AuctionBlock),
    EmailCapture(EmailCaptureBlock),
    Charity(CharityBlock),
    Thanks(ThanksBlock),
    TextBlock(TextBlockBlock),
    Gallery(GalleryBlock),
    Cta(CtaBlock),
    Video(VideoBlock),
    Quote(QuoteBlock),
    Stats(StatsBlock),
    Downloads(DownloadsBlock),
    Spacer(SpacerBlock),
    Divider(DividerBlock),
    TwoColumn(TwoColumnBlock),
    FeatureGrid(FeatureGridBlock),
    Timeline(TimelineBlock),
    Team(TeamBlock),
    LogoGrid(LogoGridBlock),
    Map(MapBlock),
    ImageText(ImageTextBlock),
    CustomHtml(CustomHtmlBlock),
    Accordion(AccordionBlock),
    Countdown(CountdownBlock),
}

/// Every `type` tag the router recognizes, in declaration order.
pub const KNOWN_KINDS: [&str; 26] = [
    "hero",
    "curator",
    "artwork",
    "auction",
    "email_capture",
    "charity",
    "thanks",
    "text_block",
    "gallery",
    "cta",
    "video",
    "quote",
    "stats",
    "downloads",
    "spacer",
    "divider",
    "two_column",
    "feature_grid",
    "timeline",
    "team",
    "logo_grid",
    "map",
    "image_text",
    "custom_html",
    "accordion",
    "countdown",
];

impl Section {
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Hero(_) => "hero",
            Section::Curator(_) => "curator",
            Section::Artwork(_) => "artwork",
            Section::Auction(_) => "auction",
            Section::EmailCapture(_) => "email_capture",
            Section::Charity(_) => "charity",
            Section::Thanks(_) => "thanks",
            Section::TextBlock(_) => "text_block",
            Section::Gallery(_) => "gallery",
            Section::Cta(_) => "cta",
            Section::Video(_) => "video",
            Section::Quote(_) => "quote",
            Section::Stats(_) => "stats",
            Section::Downloads(_) => "downloads",
            Section::Spacer(_) => "spacer",
            Section::Divider(_) => "divider",
            Section::TwoColumn(_) => "two_column",
            Section::FeatureGrid(_) => "feature_grid",
            Section::Timeline(_) => "timeline",
            Section::Team(_) => "team",
            Section::LogoGrid(_) => "logo_grid",
            Section::Map(_) => "map",
            Section::ImageText(_) => "image_text",
            Section::CustomHtml(_) => "custom_html",
            Section::Accordion(_) => "accordion",
            Section::Countdown(_) => "countdown",
        }
    }
}

/// A scalar that editors sometimes type as a number and sometimes as a
/// string (column counts, mostly). Rendered as its textual form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Text(String),
    Number(i64),
}

impl TextValue {
    pub fn text(&self) -> String {
        match self {
            TextValue::Text(value) => value.clone(),
            TextValue::Number(value) => value.to_string(),
        }
    }
}

/// Nested email-form settings on the hero. Older entries carry the same
/// knobs as flat fields on the section itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeroEmailForm {
    pub show: Option<bool>,
    pub placeholder: Option<String>,
    pub show_interests: Option<bool>,
    pub interests_label: Option<String>,
    pub interests: Vec<InterestOption>,
    pub button_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeroCta {
    pub show: Option<bool>,
    pub text: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeroBlock {
    pub style: Option<String>,
    pub pre_headline: Option<String>,
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    pub email_form: Option<HeroEmailForm>,
    pub interests: Vec<InterestOption>,
    pub cta: Option<HeroCta>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub microcopy: Option<String>,
    pub show_form: Option<bool>,
    pub show_social: Option<bool>,
    pub hero_image: Option<String>,
    pub hero_image_alt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CuratorBlock {
    pub label: Option<String>,
    pub essay_title: Option<String>,
    pub name: Option<String>,
    pub excerpt: Option<String>,
    pub excerpt_2: Option<String>,
    pub read_more_link: Option<String>,
    pub read_more_text: Option<String>,
}

/// Inclusion entries are either bare strings or `{ item: … }` records,
/// depending on which revision of the CMS config wrote them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InclusionItem {
    Plain(String),
    Keyed { item: Option<String> },
}

impl InclusionItem {
    pub fn text(&self) -> &str {
        match self {
            InclusionItem::Plain(value) => value,
            InclusionItem::Keyed { item } => item.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtworkBlock {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub edition: Option<String>,
    pub framing: Option<String>,
    pub inclusions: Vec<InclusionItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuctionBlock {
    pub status: Option<String>,
    pub label: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub date_sub: Option<String>,
    pub estimate: Option<String>,
    pub estimate_sub: Option<String>,
    pub format: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub note: Option<String>,
}

/// Interest checkboxes share the string-or-record shape of inclusions.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InterestOption {
    Plain(String),
    Keyed { option: Option<String> },
}

impl InterestOption {
    pub fn text(&self) -> &str {
        match self {
            InterestOption::Plain(value) => value,
            InterestOption::Keyed { option } => option.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailCaptureBlock {
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    pub text: Option<String>,
    pub form_title: Option<String>,
    pub form_subtitle: Option<String>,
    pub button_text: Option<String>,
    pub interests: Vec<InterestOption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CharityBlock {
    pub label: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThanksBlock {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextBlockBlock {
    pub background: Option<String>,
    pub label: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GalleryBlock {
    pub columns: Option<TextValue>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CtaBlock {
    pub headline: Option<String>,
    pub text: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VideoBlock {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteBlock {
    pub text: Option<String>,
    pub attribution: Option<String>,
    pub attribution_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatItem {
    pub value: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatsBlock {
    pub style: Option<String>,
    pub columns: Option<TextValue>,
    pub title: Option<String>,
    pub items: Vec<StatItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DownloadFile {
    pub icon: Option<String>,
    pub file: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DownloadsBlock {
    pub title: Option<String>,
    pub files: Vec<DownloadFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpacerBlock {
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DividerBlock {
    pub style: Option<String>,
    pub width: Option<String>,
    pub spacing: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColumnContent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TwoColumnBlock {
    pub layout: Option<String>,
    pub background: Option<String>,
    pub title: Option<String>,
    pub left: Option<ColumnContent>,
    pub right: Option<ColumnContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeatureItem {
    pub icon: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeatureGridBlock {
    pub columns: Option<TextValue>,
    pub background: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub features: Vec<FeatureItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimelineEvent {
    pub date: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimelineBlock {
    pub layout: Option<String>,
    pub title: Option<String>,
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub photo: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamBlock {
    pub columns: Option<TextValue>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub people: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogoItem {
    pub logo: Option<String>,
    pub name: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogoGridBlock {
    pub columns: Option<TextValue>,
    pub grayscale: Option<bool>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub logos: Vec<LogoItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MapBlock {
    pub title: Option<String>,
    pub embed_url: Option<String>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub directions_link: Option<String>,
    pub info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageTextBlock {
    pub text_position: Option<String>,
    pub text_align: Option<String>,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
}

/// The one deliberate hole in the escaping contract: `html` and `css` are
/// injected verbatim. Only trusted editors can author this block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomHtmlBlock {
    pub id: Option<String>,
    pub css: Option<String>,
    pub html: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccordionItem {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccordionBlock {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub expand_first: Option<bool>,
    pub items: Vec<AccordionItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CountdownBlock {
    pub style: Option<String>,
    pub title: Option<String>,
    pub target_date: Option<String>,
    pub expired_message: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
}
