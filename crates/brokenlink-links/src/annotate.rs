//! The external link annotation pass.

use crate::document::HtmlDocument;

/// Navigation target that opens a link in a new browsing context.
pub const NEW_BROWSING_CONTEXT: &str = "_blank";

/// Outcome of one annotation pass over a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Hyperlink elements inspected
    pub inspected: usize,

    /// Links pointing at another host
    pub external: usize,

    /// External links whose target actually changed
    pub changed: usize,
}

impl std::ops::AddAssign for Annotation {
    fn add_assign(&mut self, other: Self) {
        self.inspected += other.inspected;
        self.external += other.external;
        self.changed += other.changed;
    }
}

/// Whether a link host counts as external to the document host.
///
/// An empty link host is never external: relative links, fragments and
/// script actions all stay in the current browsing context.
pub fn is_external(link_host: &str, document_host: &str) -> bool {
    !link_host.is_empty() && link_host != document_host
}

/// Mark every external link in `doc` to open in a new browsing context.
///
/// Links are visited in document order. Internal links and links without a
/// host are left exactly as they were. Running the pass again is a no-op.
pub fn annotate_external_links(doc: &mut HtmlDocument) -> Annotation {
    let host = doc.host().to_string();
    let mut annotation = Annotation::default();

    for link in doc.links_mut() {
        annotation.inspected += 1;

        if !is_external(link.hostname(), &host) {
            continue;
        }

        annotation.external += 1;
        if link.set_target(NEW_BROWSING_CONTEXT) {
            tracing::trace!("Opening {} in a new context", link.hostname());
            annotation.changed += 1;
        }
    }

    annotation
}
