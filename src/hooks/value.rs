//! Values handed to hook handlers.

use std::path::Path;

use crate::{
    build::SiteData,
    collection::CollectionMap,
    config::SiteConfig,
    content::{ContentItem, FrontMatter},
    tags::TagIndex,
};

/// Mutable target of a fire hook. Mutations land in place.
pub enum HookTarget<'a> {
    /// `afterConfigLoad`, `beforeBuild`
    Config(&'a mut SiteConfig),
    /// `afterContentLoad`, `beforeSiteData`, `beforeRender`, `afterRender`, `afterBuild`
    Site(&'a mut SiteData),
    /// `afterTagCollections`
    Tags {
        tags: &'a mut TagIndex,
        collections: &'a CollectionMap,
        config: &'a SiteConfig,
    },
}

impl HookTarget<'_> {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Site(_) => "site data",
            Self::Tags { .. } => "tags",
        }
    }
}

/// Value threaded through a fold hook.
#[derive(Debug, Clone, PartialEq)]
pub enum FoldValue {
    /// Raw text, markdown body or HTML
    Text(String),
    /// `afterContentParse`
    Item(Box<ContentItem>),
}

impl FoldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&ContentItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Item(_) => None,
        }
    }

    pub fn into_item(self) -> Option<ContentItem> {
        match self {
            Self::Item(item) => Some(*item),
            Self::Text(_) => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Item(_) => "item",
        }
    }

    /// Whether `other` can replace `self` in a fold.
    pub fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Read-only context passed with a fold value.
#[derive(Debug, Clone, Copy)]
pub struct FoldContext<'a> {
    pub file_path: &'a Path,
    /// Present for `beforeMarkdown` and `afterMarkdown`.
    pub front_matter: Option<&'a FrontMatter>,
    pub config: &'a SiteConfig,
}

impl<'a> FoldContext<'a> {
    pub fn new(file_path: &'a Path, config: &'a SiteConfig) -> Self {
        Self {
            file_path,
            front_matter: None,
            config,
        }
    }

    pub fn with_front_matter(mut self, front_matter: &'a FrontMatter) -> Self {
        self.front_matter = Some(front_matter);
        self
    }
}
