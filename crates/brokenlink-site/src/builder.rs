//! Site post-processing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use url::Url;
use walkdir::WalkDir;

use brokenlink_links::{
    annotate_external_links, page_location, Annotation, DocumentError, HtmlDocument,
};
use brokenlink_theme::{
    generate_stylesheet, minify_css, scan_content, ContentPattern, PurgeConfig, ThemeConfig,
    ThemeError,
};

/// Site URL used when none is configured.
pub const DEFAULT_SITE_URL: &str = "http://localhost:8000/";

/// Configuration for post-processing a built site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root; purge content patterns resolve against it
    pub root: PathBuf,

    /// Directory holding the generated site
    pub site_dir: PathBuf,

    /// Public URL the site is served from
    pub site_url: Url,

    /// Run the external link pass over every page
    pub annotate_links: bool,

    /// Write the palette stylesheet
    pub generate_css: bool,

    /// Stylesheet path, relative to the site directory
    pub stylesheet: PathBuf,

    /// Minify the stylesheet
    pub minify: bool,

    /// Palette settings
    pub theme: ThemeConfig,

    /// Purge settings
    pub purge: PurgeConfig,

    /// Captured value of the purge environment variable
    pub build_env: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            site_dir: PathBuf::from("_site"),
            site_url: Url::parse(DEFAULT_SITE_URL).expect("Invalid default site URL"),
            annotate_links: true,
            generate_css: true,
            stylesheet: PathBuf::from("theme/css/palette.css"),
            minify: true,
            theme: ThemeConfig::default(),
            purge: PurgeConfig::default(),
            build_env: None,
        }
    }
}

/// Result of a build operation.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Number of pages processed
    pub pages: usize,

    /// Pages written back because a link changed
    pub pages_rewritten: usize,

    /// Link counts summed over all pages
    pub links: Annotation,

    /// Written stylesheet, if any
    pub stylesheet: Option<PathBuf>,

    /// Utility rules in the stylesheet
    pub css_rules: usize,

    /// Rules and variables removed by purging
    pub css_purged: usize,

    /// Whether purging was on
    pub purged: bool,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read site: {0}")]
    ReadError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Invalid page URL for {path}: {message}")]
    UrlError { path: String, message: String },

    #[error("Failed to process {path}: {source}")]
    DocumentError {
        path: String,
        #[source]
        source: DocumentError,
    },

    #[error(transparent)]
    Theme(#[from] ThemeError),
}

/// A page found in the site directory.
#[derive(Debug)]
struct PageInfo {
    /// File on disk
    path: PathBuf,

    /// Where the page is served from
    location: Url,
}

/// Outcome of processing one page.
#[derive(Debug)]
struct PageOutcome {
    annotation: Annotation,
    rewritten: bool,
}

/// Static site post-processor.
pub struct SiteBuilder {
    config: BuildConfig,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Post-process the site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let mut result = BuildResult::default();

        if self.config.annotate_links {
            if !self.config.site_dir.exists() {
                return Err(BuildError::ReadError(format!(
                    "Site directory not found: {}",
                    self.config.site_dir.display()
                )));
            }

            let pages = self.discover_pages()?;

            // Pages are independent, so annotate them in parallel
            let outcomes: Vec<Result<PageOutcome, BuildError>> = pages
                .par_iter()
                .map(|page| self.annotate_page(page))
                .collect();

            for outcome in outcomes {
                let outcome = outcome?;
                result.pages += 1;
                result.links += outcome.annotation;
                if outcome.rewritten {
                    result.pages_rewritten += 1;
                }
            }
        }

        if self.config.generate_css {
            self.write_stylesheet(&mut result)?;
        }

        result.duration_ms = start.elapsed().as_millis() as u64;

        Ok(result)
    }

    /// Find every HTML page under the site directory.
    fn discover_pages(&self) -> Result<Vec<PageInfo>, BuildError> {
        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.config.site_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !ext.eq_ignore_ascii_case("html") && !ext.eq_ignore_ascii_case("htm") {
                continue;
            }

            let relative = path.strip_prefix(&self.config.site_dir).unwrap_or(path);
            let location =
                page_location(&self.config.site_url, relative).map_err(|e| BuildError::UrlError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

            pages.push(PageInfo {
                path: path.to_path_buf(),
                location,
            });
        }

        Ok(pages)
    }

    /// Load a page, run the link pass once, and write it back if it changed.
    fn annotate_page(&self, page: &PageInfo) -> Result<PageOutcome, BuildError> {
        let source = fs::read_to_string(&page.path)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", page.path.display(), e)))?;

        let document_error = |e| BuildError::DocumentError {
            path: page.path.display().to_string(),
            source: e,
        };

        let mut doc = HtmlDocument::parse(source, page.location.clone()).map_err(document_error)?;
        let annotation = annotate_external_links(&mut doc);
        let rewritten = doc.is_modified();

        tracing::debug!(
            "{}: {} links, {} external, {} changed",
            page.location,
            annotation.inspected,
            annotation.external,
            annotation.changed
        );

        if rewritten {
            let html = doc.into_html().map_err(document_error)?;
            fs::write(&page.path, html)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", page.path.display(), e)))?;
        }

        Ok(PageOutcome {
            annotation,
            rewritten,
        })
    }

    /// Globs scanned for used classes.
    ///
    /// Without configured content, the pages under the site directory are
    /// scanned, wherever that directory is.
    fn content_globs(&self) -> Vec<String> {
        if !self.config.purge.has_default_content() {
            return self.config.purge.content.clone();
        }

        let site_dir = &self.config.site_dir;
        let site = site_dir.strip_prefix(&self.config.root).unwrap_or(site_dir);
        let site = site.to_string_lossy().replace('\\', "/");
        let site = site.trim_end_matches('/');

        if site.is_empty() || site == "." {
            vec!["**/*.html".to_string()]
        } else {
            vec![format!("{}/**/*.html", site)]
        }
    }

    /// Generate the palette stylesheet, purging when the build asks for it.
    fn write_stylesheet(&self, result: &mut BuildResult) -> Result<(), BuildError> {
        let purge = self
            .config
            .purge
            .is_enabled(self.config.build_env.as_deref());

        let scan = if purge {
            let patterns = self
                .content_globs()
                .iter()
                .map(|glob| ContentPattern::new(glob))
                .collect::<Result<Vec<_>, _>>()?;
            let scan = scan_content(&self.config.root, &patterns);
            tracing::info!("Purging against {} content files", scan.files);
            Some(scan)
        } else {
            None
        };

        let palette = self.config.theme.palette();
        let sheet = generate_stylesheet(
            &palette,
            scan.as_ref().map(|s| &s.candidates),
            self.config.purge.layers_by_default,
        );

        let css = if self.config.minify {
            match minify_css(&sheet.css) {
                Ok(minified) => minified,
                Err(e) => {
                    tracing::warn!("{}", e);
                    sheet.css.clone()
                }
            }
        } else {
            sheet.css.clone()
        };

        let path = self.config.site_dir.join(&self.config.stylesheet);
        write_file(&path, &css)?;

        tracing::info!(
            "Wrote {} ({} rules, {} purged)",
            path.display(),
            sheet.utilities,
            sheet.purged
        );

        result.stylesheet = Some(path);
        result.css_rules = sheet.utilities;
        result.css_purged = sheet.purged;
        result.purged = purge;

        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}
