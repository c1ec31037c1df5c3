//! HTML document model for link annotation.
//!
//! Pages are tokenized with lol_html, which streams the source and only
//! re-serializes the start tags a handler touches. Everything else in the
//! page is written back byte for byte.

use std::path::{Component, Path};

use lol_html::errors::RewritingError;
use lol_html::{element, rewrite_str, HtmlRewriter, RewriteStrSettings, Settings};
use scraper::{Html, Selector};
use url::Url;

/// Errors raised while tokenizing or rewriting a page.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to tokenize HTML: {0}")]
    Tokenize(RewritingError),

    #[error("Failed to rewrite HTML: {0}")]
    Rewrite(RewritingError),
}

/// A hyperlink element (`<a>`) found in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Hyperlink {
    /// `href` value with character references decoded
    href: Option<String>,

    /// Host of the resolved destination, empty when there is none
    hostname: String,

    /// Current `target` value
    target: Option<String>,

    /// Whether `target` changed since parsing
    modified: bool,
}

impl Hyperlink {
    /// Host of the resolved destination address.
    ///
    /// Empty for links without an `href`, unresolvable addresses and schemes
    /// that carry no host (`javascript:`, `mailto:`, `data:`). Ports are not
    /// part of the host.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The `href` attribute, decoded.
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// The navigation target, if one is set.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Set the navigation target. Returns `false` if it already had that value.
    pub fn set_target(&mut self, value: &str) -> bool {
        if self.target.as_deref() == Some(value) {
            return false;
        }
        self.target = Some(value.to_string());
        self.modified = true;
        true
    }

    /// Whether the link was changed after parsing.
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

/// Attribute values of one `<a>` start tag, as written in the source.
struct RawLink {
    href: Option<String>,
    target: Option<String>,
}

/// A parsed HTML page located at a URL.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    source: String,
    location: Url,
    base: Url,
    links: Vec<Hyperlink>,
}

impl HtmlDocument {
    /// Parse a page that was loaded from `location`.
    pub fn parse(source: impl Into<String>, location: Url) -> Result<Self, DocumentError> {
        let source = source.into();
        let (base_href, raw_links) = collect_links(&source).map_err(DocumentError::Tokenize)?;

        // The first <base href> wins, wherever it appears.
        let base = base_href
            .and_then(|href| location.join(decode_attr(&href).trim()).ok())
            .unwrap_or_else(|| location.clone());

        let links = raw_links
            .into_iter()
            .map(|raw| {
                let href = raw.href.as_deref().map(decode_attr);
                let hostname = href
                    .as_deref()
                    .and_then(|h| base.join(h.trim()).ok())
                    .and_then(|u| u.host_str().map(str::to_string))
                    .unwrap_or_default();

                Hyperlink {
                    href,
                    hostname,
                    target: raw.target.as_deref().map(decode_attr),
                    modified: false,
                }
            })
            .collect();

        Ok(Self {
            source,
            location,
            base,
            links,
        })
    }

    /// Host name of the page itself, empty for host-less locations.
    pub fn host(&self) -> &str {
        self.location.host_str().unwrap_or("")
    }

    /// Where the page was loaded from.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// URL that relative links resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Hyperlink elements in document order.
    pub fn links(&self) -> &[Hyperlink] {
        &self.links
    }

    /// Mutable hyperlink elements in document order.
    pub fn links_mut(&mut self) -> impl Iterator<Item = &mut Hyperlink> {
        self.links.iter_mut()
    }

    /// Whether any link changed since parsing.
    pub fn is_modified(&self) -> bool {
        self.links.iter().any(Hyperlink::is_modified)
    }

    /// Serialize the page with all link changes applied.
    pub fn render(&self) -> Result<String, DocumentError> {
        if !self.is_modified() {
            return Ok(self.source.clone());
        }

        // The same tokenizer over the same source yields the same <a> sequence
        // as parsing did, so links line up by position.
        let links = &self.links;
        let mut index = 0;

        let rendered = rewrite_str(
            &self.source,
            RewriteStrSettings {
                element_content_handlers: vec![element!("a", |el| {
                    if let Some(link) = links.get(index) {
                        if let (true, Some(target)) = (link.modified, link.target.as_deref()) {
                            el.set_attribute("target", target)?;
                        }
                    }
                    index += 1;
                    Ok(())
                })],
                ..RewriteStrSettings::new()
            },
        )
        .map_err(DocumentError::Rewrite);
        rendered
    }

    /// Consume the document, returning the serialized page.
    pub fn into_html(self) -> Result<String, DocumentError> {
        if self.is_modified() {
            self.render()
        } else {
            Ok(self.source)
        }
    }
}

/// Collect the first `<base href>` and every `<a>` in document order.
fn collect_links(source: &str) -> Result<(Option<String>, Vec<RawLink>), RewritingError> {
    let mut base_href: Option<String> = None;
    let mut links: Vec<RawLink> = Vec::new();

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("base[href]", |el| {
                    if base_href.is_none() {
                        base_href = el.get_attribute("href");
                    }
                    Ok(())
                }),
                element!("a", |el| {
                    links.push(RawLink {
                        href: el.get_attribute("href"),
                        target: el.get_attribute("target"),
                    });
                    Ok(())
                }),
            ],
            ..Settings::new()
        },
        |_: &[u8]| {},
    );
    rewriter.write(source.as_bytes())?;
    rewriter.end()?;

    Ok((base_href, links))
}

/// Decode character references in an attribute value the way a browser does.
fn decode_attr(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let fragment = Html::parse_fragment(&format!(
        r#"<a href="{}"></a>"#,
        raw.replace('"', "&quot;")
    ));
    let Ok(anchor) = Selector::parse("a") else {
        return raw.to_string();
    };

    fragment
        .select(&anchor)
        .next()
        .and_then(|a| a.value().attr("href"))
        .unwrap_or(raw)
        .to_string()
}

/// Public URL of a page, given the site URL and the page's path relative to
/// the site root.
pub fn page_location(site_url: &Url, relative: &Path) -> Result<Url, url::ParseError> {
    let mut base = site_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let path = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(
                part.to_string_lossy()
                    .replace('%', "%25")
                    .replace('#', "%23")
                    .replace('?', "%3F"),
            ),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    base.join(&path)
}
