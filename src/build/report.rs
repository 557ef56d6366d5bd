//! Build phases and the summary returned from a build.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::plugin::SourceKind;
use crate::utils::plural::plural_count;

/// Build phases, in execution order. Each one finishes before the next starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InitHooks,
    LoadPlugins,
    RegisterHooks,
    AfterConfigLoad,
    BeforeBuild,
    LoadCollections,
    AfterContentLoad,
    BuildTags,
    AfterTagCollections,
    BeforeSiteData,
    BeforeRender,
    Render,
    AfterRender,
    CopyAssets,
    AfterBuild,
}

impl Phase {
    pub const ALL: [Self; 15] = [
        Self::InitHooks,
        Self::LoadPlugins,
        Self::RegisterHooks,
        Self::AfterConfigLoad,
        Self::BeforeBuild,
        Self::LoadCollections,
        Self::AfterContentLoad,
        Self::BuildTags,
        Self::AfterTagCollections,
        Self::BeforeSiteData,
        Self::BeforeRender,
        Self::Render,
        Self::AfterRender,
        Self::CopyAssets,
        Self::AfterBuild,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::InitHooks => "init-hooks",
            Self::LoadPlugins => "load-plugins",
            Self::RegisterHooks => "register-hooks",
            Self::AfterConfigLoad => "afterConfigLoad",
            Self::BeforeBuild => "beforeBuild",
            Self::LoadCollections => "load-collections",
            Self::AfterContentLoad => "afterContentLoad",
            Self::BuildTags => "build-tags",
            Self::AfterTagCollections => "afterTagCollections",
            Self::BeforeSiteData => "beforeSiteData",
            Self::BeforeRender => "beforeRender",
            Self::Render => "render",
            Self::AfterRender => "afterRender",
            Self::CopyAssets => "copy-assets",
            Self::AfterBuild => "afterBuild",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A plugin that took part in the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSummary {
    pub name: String,
    pub version: String,
    pub kind: SourceKind,
}

/// What a build did.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Plugins in execution order.
    pub plugins: Vec<PluginSummary>,
    /// Plugin load and validation failures that did not abort the build.
    pub plugin_errors: Vec<String>,
    pub hooks_registered: usize,
    pub items: BTreeMap<String, usize>,
    pub drafts_skipped: usize,
    /// Files that could not be read or parsed.
    pub files_dropped: usize,
    pub tags: usize,
    pub pages_written: usize,
    pub assets_copied: usize,
    /// Phases that completed, in order.
    pub phases: Vec<Phase>,
    pub elapsed: Duration,
}

impl BuildReport {
    /// Record a finished phase.
    pub fn complete(&mut self, phase: Phase) {
        crate::debug!("build"; "phase `{}` done", phase);
        self.phases.push(phase);
    }

    pub fn total_items(&self) -> usize {
        self.items.values().sum()
    }

    /// One-line summary for the build log.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            plural_count(self.total_items(), "item"),
            plural_count(self.pages_written, "page"),
        ];
        if self.tags > 0 {
            parts.push(plural_count(self.tags, "tag"));
        }
        if !self.plugins.is_empty() {
            parts.push(plural_count(self.plugins.len(), "plugin"));
        }
        if self.drafts_skipped > 0 {
            parts.push(format!("{} skipped", plural_count(self.drafts_skipped, "draft")));
        }
        if self.files_dropped > 0 {
            parts.push(format!("{} dropped", plural_count(self.files_dropped, "file")));
        }
        format!("{} in {:.2?}", parts.join(", "), self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names_are_unique() {
        let mut names: Vec<_> = Phase::ALL.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Phase::ALL.len());
    }

    #[test]
    fn test_summary() {
        let mut report = BuildReport::default();
        report.items.insert("posts".into(), 2);
        report.items.insert("pages".into(), 1);
        report.pages_written = 4;
        report.drafts_skipped = 1;
        let summary = report.summary();
        assert!(summary.starts_with("3 items, 4 pages, 1 draft skipped in "));
    }
}
