//! Content loading for one collection.
//!
//! # Pipeline
//!
//! ```text
//! walk (jwalk) ─► read (rayon) ─► per file, in path order:
//!     beforeContentParse ─► front matter ─► beforeMarkdown ─► markdown
//!     ─► afterMarkdown ─► slug/date/excerpt/tags ─► afterContentParse
//! ```
//!
//! Reading fans out across threads; every hook runs on the calling thread so
//! fold order stays deterministic. A file that cannot be read or parsed is
//! logged and dropped. Hook failures only surface in strict mode, where they
//! abort loading.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rayon::prelude::*;

use super::{ContentError, ContentItem, FrontMatter, MarkdownOptions, excerpt, parse_front_matter};
use crate::config::{CollectionConfig, SiteConfig};
use crate::core::FileKind;
use crate::hooks::{FoldContext, Hook, HookDispatcher};
use crate::utils::date::ContentDate;
use crate::utils::path::{slugify, strip_date_prefix};
use crate::{debug, log};

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Stem names that take their slug from the parent folder.
const INDEX_STEMS: &[&str] = &["index", "_index"];

/// Result of loading one collection.
#[derive(Debug, Default)]
pub struct LoadedCollection {
    pub items: Vec<ContentItem>,
    /// Files skipped because they could not be read or parsed.
    pub dropped: usize,
}

/// Loads content files and runs the content hooks over them.
pub struct ContentLoader<'a> {
    config: &'a SiteConfig,
    dispatcher: &'a HookDispatcher,
    markdown: MarkdownOptions,
}

impl<'a> ContentLoader<'a> {
    pub fn new(config: &'a SiteConfig, dispatcher: &'a HookDispatcher) -> Self {
        Self {
            config,
            dispatcher,
            markdown: MarkdownOptions::site(),
        }
    }

    /// Source directory for a collection: the static prefix of its path.
    pub fn collection_dir(&self, collection: &CollectionConfig) -> PathBuf {
        self.config.content_dir().join(collection.static_prefix())
    }

    /// Load every markdown file beneath the collection's directory.
    pub fn load_collection(
        &self,
        name: &str,
        collection: &CollectionConfig,
    ) -> Result<LoadedCollection, ContentError> {
        let dir = self.collection_dir(collection);
        if !dir.is_dir() {
            log!("warning"; "collection `{}`: directory {} not found, skipping", name, dir.display());
            return Ok(LoadedCollection::default());
        }

        let files = collect_markdown_files(&dir);
        debug!("content"; "collection `{}`: {} files in {}", name, files.len(), dir.display());

        // I/O fan-out; collect keeps input order
        let sources: Vec<_> = files
            .into_par_iter()
            .map(|path| {
                let text = fs::read_to_string(&path);
                (path, text)
            })
            .collect();

        let mut loaded = LoadedCollection::default();
        for (path, text) in sources {
            let result = match text {
                Ok(raw) => self.load_file(name, collection, &path, raw),
                Err(source) => Err(ContentError::Read { path, source }),
            };
            match result {
                Ok(item) => loaded.items.push(item),
                Err(err) if err.is_recoverable() => {
                    log!("error"; "{}", err);
                    loaded.dropped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(loaded)
    }

    /// Turn one file's raw text into a content item.
    pub fn load_file(
        &self,
        name: &str,
        collection: &CollectionConfig,
        path: &Path,
        raw: String,
    ) -> Result<ContentItem, ContentError> {
        let ctx = FoldContext::new(path, self.config);
        let raw = self.dispatcher.fold_text(Hook::BeforeContentParse, raw, &ctx)?;

        let (front_matter, body) = parse_front_matter(&raw).map_err(|message| ContentError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        let body = body.to_string();

        let md_ctx = ctx.with_front_matter(&front_matter);
        let markdown = self
            .dispatcher
            .fold_text(Hook::BeforeMarkdown, body.clone(), &md_ctx)?;
        let html = self.markdown.render_html(&markdown);
        let html = self.dispatcher.fold_text(Hook::AfterMarkdown, html, &md_ctx)?;

        let slug = resolve_slug(&front_matter, path);
        let date = resolve_date(&front_matter, path);
        let excerpt = front_matter
            .excerpt
            .clone()
            .unwrap_or_else(|| excerpt::extract(&markdown));
        let excerpt_html = if excerpt.is_empty() {
            String::new()
        } else {
            self.markdown.render_html(&excerpt)
        };

        let item = ContentItem {
            file_path: path.to_path_buf(),
            collection: name.to_string(),
            title: front_matter.title.clone().unwrap_or_else(|| slug.clone()),
            slug,
            date,
            layout: front_matter.layout.clone().or_else(|| collection.layout.clone()),
            permalink: String::new(),
            url: String::new(),
            output_path: PathBuf::new(),
            draft: front_matter.draft,
            tags: front_matter.tags.clone(),
            excerpt,
            excerpt_html,
            content: html,
            raw_content: body,
            front_matter,
        };

        Ok(self.dispatcher.fold_item(Hook::AfterContentParse, item, &ctx)?)
    }
}

/// Collect markdown files beneath `dir`, sorted by path.
pub fn collect_markdown_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .filter(|p| FileKind::is_markdown(p))
        .collect();
    files.sort();
    files
}

// ============================================================================
// Field resolution
// ============================================================================

/// Name the slug and date are derived from: the file stem, or the parent
/// folder for `index.md`.
fn source_name(path: &Path) -> &str {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    if INDEX_STEMS.iter().any(|s| stem.eq_ignore_ascii_case(s))
        && let Some(parent) = path.parent().and_then(|p| p.file_name()).and_then(|n| n.to_str())
    {
        return parent;
    }
    stem
}

/// Front matter, then the source name without its date prefix, then the
/// slugified source name.
fn resolve_slug(front_matter: &FrontMatter, path: &Path) -> String {
    if let Some(slug) = front_matter.slug.as_deref().map(str::trim)
        && !slug.is_empty()
    {
        return slug.to_string();
    }

    let name = source_name(path);
    let slug = match strip_date_prefix(name) {
        Some((_, rest)) => rest.to_string(),
        None => slugify(name),
    };
    if slug.is_empty() { "untitled".to_string() } else { slug }
}

/// Front matter, then the source name's date prefix, then today.
fn resolve_date(front_matter: &FrontMatter, path: &Path) -> ContentDate {
    if let Some(raw) = front_matter.date.as_deref() {
        match ContentDate::parse(raw) {
            Some(date) => return date,
            None => log!("warning"; "{}: unrecognised date `{}`", path.display(), raw),
        }
    }

    match strip_date_prefix(source_name(path)) {
        Some((date, _)) => ContentDate::new(date),
        None => ContentDate::today(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_site_config;
    use crate::core::BuildMode;
    use crate::hooks::{FoldValue, Handler, HookEntry};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn setup() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let config = test_site_config(dir.path(), "");
        (dir, config)
    }

    fn dispatcher(config: &SiteConfig) -> HookDispatcher {
        HookDispatcher::new(Arc::new(config.clone()), BuildMode::DEVELOPMENT)
    }

    fn posts(config: &SiteConfig) -> CollectionConfig {
        config.collections["posts"].clone()
    }

    #[test]
    fn test_slug_and_date_from_folder() {
        let (dir, config) = setup();
        write(dir.path(), "content/posts/2024-12-17-my-post/index.md", "Hello world.");
        let d = dispatcher(&config);
        let loaded = ContentLoader::new(&config, &d)
            .load_collection("posts", &posts(&config))
            .unwrap();

        let item = &loaded.items[0];
        assert_eq!(item.slug, "my-post");
        assert_eq!(item.date, ContentDate::from_ymd(2024, 12, 17).unwrap());
        assert_eq!(item.title, "my-post");
        assert_eq!(item.collection, "posts");
        assert_eq!(item.layout.as_deref(), Some("post"));
    }

    #[test]
    fn test_front_matter_slug_overrides() {
        let (dir, config) = setup();
        write(
            dir.path(),
            "content/posts/2024-12-17-my-post/index.md",
            "---\nslug: custom\n---\nHello",
        );
        let d = dispatcher(&config);
        let loaded = ContentLoader::new(&config, &d)
            .load_collection("posts", &posts(&config))
            .unwrap();
        assert_eq!(loaded.items[0].slug, "custom");
        assert_eq!(loaded.items[0].date, ContentDate::from_ymd(2024, 12, 17).unwrap());
    }

    #[test]
    fn test_front_matter_date_wins() {
        let (dir, config) = setup();
        write(
            dir.path(),
            "content/posts/2024-12-17-post.md",
            "---\ndate: 2023-01-02T23:30:00+05:00\n---\nBody",
        );
        let d = dispatcher(&config);
        let loaded = ContentLoader::new(&config, &d)
            .load_collection("posts", &posts(&config))
            .unwrap();
        assert_eq!(loaded.items[0].date, ContentDate::from_ymd(2023, 1, 2).unwrap());
        assert_eq!(loaded.items[0].slug, "post");
    }

    #[test]
    fn test_undated_file_slugified() {
        let (dir, config) = setup();
        write(dir.path(), "content/posts/Hello World.md", "Body");
        let d = dispatcher(&config);
        let loaded = ContentLoader::new(&config, &d)
            .load_collection("posts", &posts(&config))
            .unwrap();
        assert_eq!(loaded.items[0].slug, "hello-world");
        assert_eq!(loaded.items[0].date, ContentDate::today());
    }

    #[test]
    fn test_fields_and_excerpt() {
        let (dir, config) = setup();
        write(
            dir.path(),
            "content/posts/a.md",
            "---\ntitle: A Post\ntags: \"rust, web\"\ndraft: true\n---\n# Heading\n\nFirst *para*.\n\nSecond.",
        );
        let d = dispatcher(&config);
        let loaded = ContentLoader::new(&config, &d)
            .load_collection("posts", &posts(&config))
            .unwrap();

        let item = &loaded.items[0];
        assert_eq!(item.title, "A Post");
        assert_eq!(item.tags, vec!["rust", "web"]);
        assert!(item.draft);
        assert_eq!(item.excerpt, "First *para*.");
        assert!(item.excerpt_html.contains("<em>para</em>"));
        assert!(item.content.contains("<h1>Heading</h1>"));
        assert!(item.raw_content.starts_with("# Heading"));
    }

    #[test]
    fn test_parse_failure_drops_item() {
        let (dir, config) = setup();
        write(dir.path(), "content/posts/good.md", "Fine");
        write(dir.path(), "content/posts/bad.md", "---\ntitle: [broken\n---\n");
        write(dir.path(), "content/posts/unclosed.md", "---\ntitle: x\n");
        write(dir.path(), "content/posts/notes.txt", "ignored");
        let d = dispatcher(&config);
        let loaded = ContentLoader::new(&config, &d)
            .load_collection("posts", &posts(&config))
            .unwrap();

        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].slug, "good");
        assert_eq!(loaded.dropped, 2);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let (_dir, config) = setup();
        let d = dispatcher(&config);
        let loaded = ContentLoader::new(&config, &d)
            .load_collection("posts", &posts(&config))
            .unwrap();
        assert!(loaded.items.is_empty());
    }

    #[test]
    fn test_date_templated_path_uses_prefix() {
        let dir = TempDir::new().unwrap();
        let config = test_site_config(
            dir.path(),
            "[collections.notes]\npath = \"notes/:year/:month\"\n",
        );
        write(dir.path(), "content/notes/2024/05/first.md", "One");
        write(dir.path(), "content/notes/2023/11/second.md", "Two");
        let d = dispatcher(&config);
        let loaded = ContentLoader::new(&config, &d)
            .load_collection("notes", &config.collections["notes"])
            .unwrap();
        let slugs: Vec<_> = loaded.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "first"]);
    }

    #[test]
    fn test_content_hooks_run_in_order() {
        let (dir, config) = setup();
        write(dir.path(), "content/posts/a.md", "---\ntitle: T\n---\nhello");
        let mut d = dispatcher(&config);

        let add = |hook: Hook, handler: Handler, d: &mut HookDispatcher| {
            d.registry_mut().register(
                hook,
                HookEntry {
                    plugin: Arc::from("test"),
                    handler,
                    options: Arc::new(serde_json::Value::Null),
                },
            );
        };
        add(
            Hook::BeforeMarkdown,
            Handler::fold(|v, ctx, _| {
                assert_eq!(ctx.front_matter.and_then(|f| f.title.as_deref()), Some("T"));
                Ok(Some(FoldValue::Text(format!("{} **there**", v.as_text().unwrap()))))
            }),
            &mut d,
        );
        add(
            Hook::AfterMarkdown,
            Handler::fold(|v, _, _| {
                Ok(Some(FoldValue::Text(v.as_text().unwrap().replace("<p>", "<p class=\"x\">"))))
            }),
            &mut d,
        );
        add(
            Hook::AfterContentParse,
            Handler::fold(|v, _, _| {
                let mut item = v.as_item().unwrap().clone();
                item.tags.push("hooked".to_string());
                Ok(Some(FoldValue::Item(Box::new(item))))
            }),
            &mut d,
        );

        let loaded = ContentLoader::new(&config, &d)
            .load_collection("posts", &posts(&config))
            .unwrap();
        let item = &loaded.items[0];
        assert_eq!(item.content.trim(), "<p class=\"x\">hello <strong>there</strong></p>");
        assert_eq!(item.raw_content, "hello");
        assert_eq!(item.tags, vec!["hooked"]);
    }

    #[test]
    fn test_strict_hook_failure_aborts() {
        let dir = TempDir::new().unwrap();
        let config = test_site_config(dir.path(), "[plugins]\nstrict_mode = true\n");
        write(dir.path(), "content/posts/a.md", "hello");
        let mut d = dispatcher(&config);
        d.registry_mut().register(
            Hook::BeforeContentParse,
            HookEntry {
                plugin: Arc::from("broken"),
                handler: Handler::fold(|_, _, _| {
                    anyhow::bail!("boom")
                }),
                options: Arc::new(serde_json::Value::Null),
            },
        );

        let err = ContentLoader::new(&config, &d)
            .load_collection("posts", &posts(&config))
            .unwrap_err();
        assert!(matches!(err, ContentError::Hook(_)));
    }
}
