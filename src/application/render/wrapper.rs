//! Shared page chrome: the nav and footer wrapped around every preview.

use std::fmt::Write as _;

/// Chrome toggles for one wrapped page.
#[derive(Debug, Clone)]
pub struct WrapOptions {
    pub show_header: bool,
    pub show_footer: bool,
    pub page_class: String,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            show_header: true,
            show_footer: true,
            page_class: String::new(),
        }
    }
}

impl WrapOptions {
    pub fn page_class(class: &str) -> Self {
        Self {
            page_class: class.to_string(),
            ..Self::default()
        }
    }
}

const NAV: &str = concat!(
    r#"<nav class="nav"><div class="container nav-inner">"#,
    r#"<a href="/" class="nav-logo"><img src="/images/logo.png" alt="ZYBORN" style="height: 32px;"></a>"#,
    r#"<ul class="nav-menu" style="display: flex;">"#,
    r#"<li><a href="/">HOME</a></li>"#,
    r#"<li><a href="/curatorial/">CURATORIAL</a></li>"#,
    "</ul></div></nav>"
);

const FOOTER: &str = concat!(
    r#"<footer class="footer"><div class="container">"#,
    r#"<div class="footer-divider"></div>"#,
    r#"<div class="footer-grid">"#,
    r##"<div class="footer-col"><h4>ZYBORN ART</h4><ul><li><a href="#">About</a></li><li><a href="#">Future charity</a></li></ul></div>"##,
    r##"<div class="footer-col"><h4>Visit</h4><ul><li><a href="#">Map &amp; directions</a></li></ul></div>"##,
    r##"<div class="footer-col"><h4>Connect</h4><ul><li><a href="#">Instagram</a></li><li><a href="#">X</a></li></ul></div>"##,
    "</div>",
    r#"<div class="footer-bottom">"#,
    r#"<p class="footer-copyright">© 2009 ZYBORN ART. All rights reserved.</p>"#,
    r##"<div class="footer-legal"><a href="#">Privacy</a> / <a href="#">Terms</a> / <span>No Cookies at the site</span></div>"##,
    "</div></div></footer>"
);

/// Wrap rendered sections in the live-site page chrome.
pub fn wrap_page(content: &str, options: &WrapOptions) -> String {
    let mut html = format!(r#"<div class="preview-page {}">"#, options.page_class);
    if options.show_header {
        html.push_str(NAV);
    }
    let _ = write!(html, "<main>{content}</main>");
    if options.show_footer {
        html.push_str(FOOTER);
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_content_with_nav_and_footer() {
        let html = wrap_page("<p>hi</p>", &WrapOptions::page_class("preview-page--home"));
        assert!(html.starts_with(r#"<div class="preview-page preview-page--home">"#));
        assert!(html.contains(r#"<nav class="nav">"#));
        assert!(html.contains("<main><p>hi</p></main>"));
        assert!(html.contains(r#"<footer class="footer">"#));
    }

    #[test]
    fn chrome_can_be_disabled() {
        let options = WrapOptions {
            show_header: false,
            show_footer: false,
            page_class: String::new(),
        };
        let html = wrap_page("<p>hi</p>", &options);
        assert!(!html.contains("<nav"));
        assert!(!html.contains("<footer"));
    }
}
