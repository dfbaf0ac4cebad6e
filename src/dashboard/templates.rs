//! HTML templates for the board listing.
//!
//! Templates are embedded at compile time using `include_str!`.

/// The page shell. `{{title}}` and `{{content}}` are substituted at render time.
pub const BASE_TEMPLATE: &str = include_str!("templates/base.html");

/// Page title shown in the header and the browser tab.
pub const PAGE_TITLE: &str = "Kanban";

/// Fill the base template with a title and an already-escaped body.
pub fn render_page(title: &str, content: &str) -> String {
    BASE_TEMPLATE
        .replace("{{title}}", &html_escape(title))
        .replace("{{content}}", content)
}

/// Escape text for use in HTML content and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<b class="x">Tom & Jerry's</b>"#),
            "&lt;b class=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/b&gt;"
        );
    }

    #[test]
    fn render_page_substitutes_placeholders() {
        let page = render_page("A<B", "<p>body</p>");
        assert!(page.contains("<title>A&lt;B</title>"));
        assert!(page.contains("<p>body</p>"));
        assert!(!page.contains("{{content}}"));
    }
}
