//! Hook points fired by the build.
//!
//! | Hook                  | Kind | Value                           |
//! |-----------------------|------|---------------------------------|
//! | `afterConfigLoad`     | fire | site config                     |
//! | `beforeBuild`         | fire | site config                     |
//! | `beforeContentParse`  | fold | raw file text                   |
//! | `beforeMarkdown`      | fold | markdown body                   |
//! | `afterMarkdown`       | fold | rendered HTML                   |
//! | `afterContentParse`   | fold | content item                    |
//! | `afterContentLoad`    | fire | site data                       |
//! | `afterTagCollections` | fire | tag index (+ collections)       |
//! | `beforeSiteData`      | fire | site data                       |
//! | `beforeRender`        | fire | site data                       |
//! | `afterRender`         | fire | site data                       |
//! | `afterBuild`          | fire | site data                       |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How handlers for a hook are invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Every handler sees the same mutable target; return values are ignored.
    Fire,
    /// Each handler's output is the next handler's input.
    Fold,
}

/// A named lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Hook {
    AfterConfigLoad,
    BeforeBuild,
    BeforeContentParse,
    BeforeMarkdown,
    AfterMarkdown,
    AfterContentParse,
    AfterContentLoad,
    AfterTagCollections,
    BeforeSiteData,
    BeforeRender,
    AfterRender,
    AfterBuild,
}

impl Hook {
    /// Every hook, in the order a build reaches them.
    pub const ALL: [Self; 12] = [
        Self::AfterConfigLoad,
        Self::BeforeBuild,
        Self::BeforeContentParse,
        Self::BeforeMarkdown,
        Self::AfterMarkdown,
        Self::AfterContentParse,
        Self::AfterContentLoad,
        Self::AfterTagCollections,
        Self::BeforeSiteData,
        Self::BeforeRender,
        Self::AfterRender,
        Self::AfterBuild,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::AfterConfigLoad => "afterConfigLoad",
            Self::BeforeBuild => "beforeBuild",
            Self::BeforeContentParse => "beforeContentParse",
            Self::BeforeMarkdown => "beforeMarkdown",
            Self::AfterMarkdown => "afterMarkdown",
            Self::AfterContentParse => "afterContentParse",
            Self::AfterContentLoad => "afterContentLoad",
            Self::AfterTagCollections => "afterTagCollections",
            Self::BeforeSiteData => "beforeSiteData",
            Self::BeforeRender => "beforeRender",
            Self::AfterRender => "afterRender",
            Self::AfterBuild => "afterBuild",
        }
    }

    pub const fn kind(self) -> HookKind {
        match self {
            Self::BeforeContentParse
            | Self::BeforeMarkdown
            | Self::AfterMarkdown
            | Self::AfterContentParse => HookKind::Fold,
            _ => HookKind::Fire,
        }
    }

    /// Content hooks run once per file rather than once per build.
    pub const fn is_per_file(self) -> bool {
        matches!(self.kind(), HookKind::Fold)
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|hook| hook.name() == s)
            .ok_or_else(|| format!("unknown hook `{s}`"))
    }
}
