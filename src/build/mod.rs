//! Build orchestration.
//!
//! # Phases
//!
//! ```text
//! init-hooks ─► load-plugins ─► register-hooks
//!   ─► [afterConfigLoad] ─► [beforeBuild]
//!   ─► load-collections ─► [afterContentLoad]
//!   ─► build-tags ─► [afterTagCollections]
//!   ─► [beforeSiteData] ─► [beforeRender]
//!   ─► render ─► [afterRender] ─► copy-assets ─► [afterBuild]
//! ```
//!
//! Every phase is a barrier: a bracketed hook finishes firing, with all of
//! its mutations applied, before the next phase reads the data. Hooks run on
//! the calling thread; only file reads and page rendering fan out.
//!
//! The hook registry belongs to the [`SiteBuilder`] and is reset at the start
//! of every build, so several builders can live in one process.

mod render;
mod report;
mod site;

pub use render::{BasicRenderer, DEFAULT_TEMPLATE, Renderer, item_data, item_template, listing_data};
pub use report::{BuildReport, Phase, PluginSummary};
pub use site::{LIST_TEMPLATE, Listing, ListingKind, ListingPage, SiteData, SiteStats, TAG_TEMPLATE};

use std::fs;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::collection::{CollectionBuilder, CollectionMap};
use crate::config::SiteConfig;
use crate::content::ContentLoader;
use crate::core::BuildMode;
use crate::hooks::{Hook, HookDispatcher, HookTarget};
use crate::logger::ProgressLine;
use crate::plugin::{Plugin, PluginRegistry};
use crate::tags::TagIndex;
use crate::{debug, log};

/// Runs builds for one site.
pub struct SiteBuilder {
    config: SiteConfig,
    mode: BuildMode,
    dispatcher: HookDispatcher,
    builtins: Vec<Arc<dyn Plugin>>,
    renderer: Box<dyn Renderer>,
}

impl SiteBuilder {
    pub fn new(config: SiteConfig, mode: BuildMode) -> Self {
        let dispatcher = HookDispatcher::new(Arc::new(config.clone()), mode);
        Self {
            config,
            mode,
            dispatcher,
            builtins: Vec::new(),
            renderer: Box::new(BasicRenderer),
        }
    }

    /// Add a compiled-in plugin. These load after filesystem plugins.
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.builtins.push(plugin);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn dispatcher(&self) -> &HookDispatcher {
        &self.dispatcher
    }

    /// Run every phase once.
    ///
    /// Config changes made by hooks apply to this build only; the next
    /// build starts again from the config the builder was created with.
    pub fn build(&mut self) -> Result<(SiteData, BuildReport)> {
        let started = Instant::now();
        let mut report = BuildReport::default();
        let mut config = self.config.clone();

        if config.build.clean {
            clean_output(&config)?;
        }

        self.dispatcher.reset();
        self.dispatcher.set_config(Arc::new(config.clone()));
        report.complete(Phase::InitHooks);

        let registry = self.load_plugins(&config, &mut report)?;
        report.complete(Phase::LoadPlugins);

        report.hooks_registered =
            registry.register_hooks(self.dispatcher.registry_mut(), &config.plugins);
        debug!("hooks"; "{} handlers registered", report.hooks_registered);
        report.complete(Phase::RegisterHooks);

        self.fire_config(Hook::AfterConfigLoad, &mut config)?;
        report.complete(Phase::AfterConfigLoad);
        self.fire_config(Hook::BeforeBuild, &mut config)?;
        report.complete(Phase::BeforeBuild);

        let collections = self.load_collections(&config, &mut report)?;
        let mut site = SiteData::new(config, collections);
        report.complete(Phase::LoadCollections);

        self.fire_site(Hook::AfterContentLoad, &mut site)?;
        report.complete(Phase::AfterContentLoad);

        site.tags = TagIndex::build(&site.collections);
        report.complete(Phase::BuildTags);

        self.fire_tags(&mut site)?;
        site.refresh_stats();
        site.refresh_listings();
        report.complete(Phase::AfterTagCollections);

        self.fire_site(Hook::BeforeSiteData, &mut site)?;
        report.complete(Phase::BeforeSiteData);
        self.fire_site(Hook::BeforeRender, &mut site)?;
        report.complete(Phase::BeforeRender);

        // hooks may have reshaped collections or tags
        site.refresh_stats();
        site.refresh_listings();
        report.items = site.stats.items.clone();
        report.tags = site.tags.len();

        report.pages_written = self.render(&site)?;
        report.complete(Phase::Render);

        self.fire_site(Hook::AfterRender, &mut site)?;
        report.complete(Phase::AfterRender);

        report.assets_copied = self
            .renderer
            .copy_assets(&site.config)
            .context("Failed to copy assets")?;
        report.complete(Phase::CopyAssets);

        self.fire_site(Hook::AfterBuild, &mut site)?;
        report.complete(Phase::AfterBuild);

        report.elapsed = started.elapsed();
        Ok((site, report))
    }

    // ========================================================================
    // phases
    // ========================================================================

    fn load_plugins(&self, config: &SiteConfig, report: &mut BuildReport) -> Result<PluginRegistry> {
        let mut registry = PluginRegistry::load(&config.plugins, &self.builtins);
        registry.order(&config.plugins.order);
        registry.check_strict(config.plugins.strict_mode)?;

        report.plugin_errors = registry.errors().iter().map(ToString::to_string).collect();
        report.plugins = registry
            .plugins()
            .iter()
            .map(|p| PluginSummary {
                name: p.name().to_string(),
                version: p.version().to_string(),
                kind: p.kind,
            })
            .collect();

        if !registry.is_empty() {
            log!("plugins"; "{}", registry.names().join(", "));
        }
        Ok(registry)
    }

    fn load_collections(&self, config: &SiteConfig, report: &mut BuildReport) -> Result<CollectionMap> {
        let loader = ContentLoader::new(config, &self.dispatcher);
        let builder = CollectionBuilder::new(config, self.mode);

        let mut collections = CollectionMap::new();
        for (name, collection) in &config.collections {
            let loaded = loader
                .load_collection(name, collection)
                .with_context(|| format!("Failed to load collection `{name}`"))?;
            report.files_dropped += loaded.dropped;

            let built = builder.build(name, collection, loaded.items);
            report.drafts_skipped += built.drafts_skipped;
            collections.insert(name.clone(), built.collection);
        }
        Ok(collections)
    }

    /// Fire a config hook and hand the result to later handlers.
    fn fire_config(&mut self, hook: Hook, config: &mut SiteConfig) -> Result<()> {
        self.dispatcher.fire(hook, &mut HookTarget::Config(config))?;
        self.dispatcher.set_config(Arc::new(config.clone()));
        Ok(())
    }

    fn fire_site(&mut self, hook: Hook, site: &mut SiteData) -> Result<()> {
        if !self.dispatcher.registry().has_handlers(hook) {
            return Ok(());
        }
        self.dispatcher.fire(hook, &mut HookTarget::Site(site))?;
        self.dispatcher.set_config(Arc::new(site.config.clone()));
        Ok(())
    }

    fn fire_tags(&self, site: &mut SiteData) -> Result<()> {
        let SiteData {
            config,
            collections,
            tags,
            ..
        } = site;
        let mut target = HookTarget::Tags {
            tags,
            collections: &*collections,
            config: &*config,
        };
        self.dispatcher.fire(Hook::AfterTagCollections, &mut target)?;
        Ok(())
    }

    /// Render every item and listing page. Returns pages written.
    fn render(&self, site: &SiteData) -> Result<usize> {
        let items: Vec<_> = site.items().collect();
        let pages: Vec<_> = site
            .listings
            .iter()
            .flat_map(|listing| listing.pages.iter().map(move |page| (listing, page)))
            .collect();

        let progress = ProgressLine::new(&[("items", items.len()), ("listings", pages.len())]);
        let renderer = self.renderer.as_ref();

        items.par_iter().try_for_each(|item| -> Result<()> {
            let template = item_template(item, site);
            let html = renderer
                .render(template, &item_data(item, site)?)
                .with_context(|| format!("Failed to render {}", item.file_path.display()))?;
            render::write_page(&item.output_path, &html)?;
            progress.inc("items");
            Ok(())
        })?;

        pages.par_iter().try_for_each(|(listing, page)| -> Result<()> {
            let html = renderer
                .render(&listing.template, &listing_data(listing, page, site)?)
                .with_context(|| format!("Failed to render {}", page.urls.current))?;
            render::write_page(&page.output_path, &html)?;
            progress.inc("listings");
            Ok(())
        })?;

        progress.finish();
        Ok(items.len() + pages.len())
    }
}

/// Remove the output directory before a clean build.
fn clean_output(config: &SiteConfig) -> Result<()> {
    let output = config.output_dir();
    if output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
        debug!("build"; "cleared {}", output.display());
    }
    Ok(())
}

// ============================================================================
// tests
// ============================================================================
