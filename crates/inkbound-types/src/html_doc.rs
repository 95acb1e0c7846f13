use scraper::{Html, Selector};
use std::collections::HashMap;

/// An opaque handle to a parsed article document.
///
/// Owned by the Extractor stage until the Packager stage consumes it via
/// [`HtmlDoc::render`]. Rewriting (e.g. localizing `<img src>` attributes) is
/// done by the extractor's image pipeline before the doc is wrapped here, since
/// the underlying parser trades mutability for a cheap, read-only tree.
#[derive(Debug, Clone)]
pub struct HtmlDoc {
    html: String,
}

impl HtmlDoc {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Visit every element matching `tag_name`, handing the visitor its attributes.
    pub fn for_each_element(&self, tag_name: &str, mut visitor: impl FnMut(&HashMap<String, String>)) {
        let fragment = Html::parse_fragment(&self.html);
        let Ok(selector) = Selector::parse(tag_name) else {
            return;
        };
        for element in fragment.select(&selector) {
            let attrs: HashMap<String, String> = element
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            visitor(&attrs);
        }
    }

    /// Render the document back to a string for embedding in the final page.
    pub fn render(&self) -> &str {
        &self.html
    }
}
