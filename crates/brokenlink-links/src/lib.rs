//! External link annotation for rendered HTML pages.
//!
//! Every `<a>` element whose destination host differs from the page's own host
//! is marked to open in a new browsing context. The pass runs once per loaded
//! page and leaves everything else in the document untouched.

pub mod annotate;
pub mod document;

pub use annotate::{annotate_external_links, is_external, Annotation, NEW_BROWSING_CONTEXT};
pub use document::{page_location, DocumentError, HtmlDocument, Hyperlink};
