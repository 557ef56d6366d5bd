//! Hooks backed by external commands.
//!
//! The hook input goes to the command's stdin and a non-empty stdout
//! replaces it:
//!
//! | Hook input       | stdin         | stdout                          |
//! |------------------|---------------|---------------------------------|
//! | text (fold)      | verbatim      | verbatim replacement            |
//! | item (fold)      | JSON          | JSON item                       |
//! | fire target      | JSON          | JSON config / site data / tags  |
//!
//! Empty stdout leaves the input unchanged. The command runs in the site root
//! with `$PLUME_*` variables set in its environment and substituted in its
//! arguments.

use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};

use crate::build::SiteData;
use crate::config::SiteConfig;
use crate::hooks::{FoldContext, FoldValue, Handler, Hook, HookKind, HookTarget, PluginApi};
use crate::tags::TagIndex;
use crate::utils::exec::Cmd;

/// A command registered for one hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHook {
    pub hook: Hook,
    /// Program followed by its arguments.
    pub command: Vec<String>,
    /// Do not forward the command's stderr.
    pub quiet: bool,
}

impl CommandHook {
    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    /// Wrap this command as a handler of the hook's kind.
    pub fn into_handler(self) -> Handler {
        match self.hook.kind() {
            HookKind::Fire => Handler::fire(move |target, api| self.fire(target, api)),
            HookKind::Fold => Handler::fold(move |value, ctx, api| self.fold(value, ctx, api)),
        }
    }

    fn fire(&self, target: &mut HookTarget<'_>, api: &PluginApi) -> Result<()> {
        let input = match target {
            HookTarget::Config(config) => serde_json::to_string(&**config)?,
            HookTarget::Site(site) => serde_json::to_string(&**site)?,
            HookTarget::Tags { tags, .. } => serde_json::to_string(&**tags)?,
        };
        let Some(output) = self.run(api, input.as_bytes(), None)? else {
            return Ok(());
        };

        match target {
            HookTarget::Config(config) => {
                let mut next: SiteConfig = parse_json(&output, "config")?;
                keep_paths(&mut next, config);
                **config = next;
            }
            HookTarget::Site(site) => {
                let mut next: SiteData = parse_json(&output, "site data")?;
                keep_paths(&mut next.config, &site.config);
                **site = next;
            }
            HookTarget::Tags { tags, .. } => {
                **tags = parse_json::<TagIndex>(&output, "tags")?;
            }
        }
        Ok(())
    }

    fn fold(&self, value: &FoldValue, ctx: &FoldContext<'_>, api: &PluginApi) -> Result<Option<FoldValue>> {
        let file = Some(ctx.file_path);
        match value {
            FoldValue::Text(text) => Ok(self
                .run(api, text.as_bytes(), file)?
                .map(FoldValue::Text)),
            FoldValue::Item(item) => {
                let input = serde_json::to_string(item)?;
                match self.run(api, input.as_bytes(), file)? {
                    Some(output) => Ok(Some(FoldValue::Item(Box::new(parse_json(&output, "item")?)))),
                    None => Ok(None),
                }
            }
        }
    }

    /// Run the command. `None` when it printed nothing.
    fn run(&self, api: &PluginApi, input: &[u8], file: Option<&Path>) -> Result<Option<String>> {
        let vars = build_plume_vars(api, self.hook, file);
        let args = resolve_args(&self.command, &vars);

        let output = Cmd::from_slice(&args)
            .cwd(api.config().get_root())
            .envs(&vars)
            .stdin(input)
            .quiet(self.quiet)
            .run()?;

        let stdout = String::from_utf8(output.stdout)
            .with_context(|| format!("`{}` wrote non UTF-8 output", self.program()))?;
        if stdout.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(stdout))
        }
    }
}

fn parse_json<T: DeserializeOwned>(output: &str, what: &str) -> Result<T> {
    serde_json::from_str(output).with_context(|| format!("command printed invalid {what} JSON"))
}

/// Paths are not serialized; a replacement config keeps the current ones.
fn keep_paths(next: &mut SiteConfig, current: &SiteConfig) {
    next.config_path = current.config_path.clone();
    next.set_root(current.get_root());
}

// ============================================================================
// Environment Variables
// ============================================================================

/// Build `$PLUME_*` environment variables for one command invocation.
pub fn build_plume_vars(api: &PluginApi, hook: Hook, file: Option<&Path>) -> FxHashMap<String, String> {
    let config = api.config();
    let mut vars = FxHashMap::default();

    vars.insert("PLUME_ROOT".into(), config.get_root().display().to_string());
    vars.insert("PLUME_OUTPUT_DIR".into(), config.output_dir().display().to_string());
    vars.insert("PLUME_MODE".into(), api.mode().name().into());
    vars.insert("PLUME_HOOK".into(), hook.name().into());
    vars.insert("PLUME_PLUGIN".into(), api.plugin_name().into());
    vars.insert("PLUME_PLUGIN_OPTIONS".into(), to_json(api.options()));
    if let Some(file) = file {
        vars.insert("PLUME_FILE".into(), file.display().to_string());
    }

    vars
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Resolve `$PLUME_*` variables in command arguments.
///
/// Longer names are substituted first so `$PLUME_PLUGIN_OPTIONS` is not
/// read as `$PLUME_PLUGIN` followed by `_OPTIONS`.
pub fn resolve_args(args: &[String], vars: &FxHashMap<String, String>) -> Vec<String> {
    let mut keys: Vec<&String> = vars.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    args.iter()
        .map(|arg| {
            let mut result = arg.clone();
            for key in &keys {
                let pattern = format!("${key}");
                result = result.replace(&pattern, &vars[*key]);
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_site_config;
    use crate::content::sample_item;
    use crate::core::BuildMode;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn api(config: SiteConfig) -> PluginApi {
        PluginApi::new(
            Arc::from("demo"),
            Arc::new(serde_json::json!({ "n": 1 })),
            Arc::new(config),
            BuildMode::PRODUCTION,
        )
    }

    #[test]
    fn test_resolve_args_simple() {
        let mut vars = FxHashMap::default();
        vars.insert("PLUME_OUTPUT_DIR".to_string(), "/out".to_string());
        vars.insert("PLUME_PLUGIN".to_string(), "demo".to_string());
        vars.insert("PLUME_PLUGIN_OPTIONS".to_string(), "{}".to_string());

        let args = vec![
            "$PLUME_OUTPUT_DIR/feed.xml".to_string(),
            "--opts=$PLUME_PLUGIN_OPTIONS".to_string(),
            "$PLUME_PLUGIN".to_string(),
            "plain".to_string(),
        ];
        assert_eq!(
            resolve_args(&args, &vars),
            vec!["/out/feed.xml", "--opts={}", "demo", "plain"]
        );
    }

    #[test]
    fn test_vars() {
        let dir = TempDir::new().unwrap();
        let api = api(test_site_config(dir.path(), ""));
        let vars = build_plume_vars(&api, Hook::AfterMarkdown, Some(Path::new("a.md")));
        assert_eq!(vars["PLUME_MODE"], "production");
        assert_eq!(vars["PLUME_HOOK"], "afterMarkdown");
        assert_eq!(vars["PLUME_PLUGIN"], "demo");
        assert_eq!(vars["PLUME_PLUGIN_OPTIONS"], r#"{"n":1}"#);
        assert_eq!(vars["PLUME_FILE"], "a.md");
        assert!(vars["PLUME_OUTPUT_DIR"].ends_with("public"));
    }

    #[cfg(unix)]
    #[test]
    fn test_text_fold_through_command() {
        let dir = TempDir::new().unwrap();
        let config = test_site_config(dir.path(), "");
        let api = api(config.clone());
        let hook = CommandHook {
            hook: Hook::AfterMarkdown,
            command: vec!["sh".into(), "-c".into(), "tr a-z A-Z".into()],
            quiet: true,
        };
        let ctx = FoldContext::new(Path::new("a.md"), &config);
        let out = hook
            .fold(&FoldValue::Text("<p>hi</p>".into()), &ctx, &api)
            .unwrap();
        assert_eq!(out, Some(FoldValue::Text("<P>HI</P>".into())));
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_output_keeps_value() {
        let dir = TempDir::new().unwrap();
        let config = test_site_config(dir.path(), "");
        let api = api(config.clone());
        let hook = CommandHook {
            hook: Hook::AfterContentParse,
            command: vec!["sh".into(), "-c".into(), "cat > /dev/null".into()],
            quiet: true,
        };
        let ctx = FoldContext::new(Path::new("a.md"), &config);
        let item = FoldValue::Item(Box::new(sample_item("x")));
        assert_eq!(hook.fold(&item, &ctx, &api).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_item_round_trips_through_command() {
        let dir = TempDir::new().unwrap();
        let config = test_site_config(dir.path(), "");
        let api = api(config.clone());
        let hook = CommandHook {
            hook: Hook::AfterContentParse,
            command: vec!["sh".into(), "-c".into(), "sed 's/\"slug\":\"x\"/\"slug\":\"y\"/'".into()],
            quiet: true,
        };
        let ctx = FoldContext::new(Path::new("a.md"), &config);
        let out = hook
            .fold(&FoldValue::Item(Box::new(sample_item("x"))), &ctx, &api)
            .unwrap()
            .unwrap();
        assert_eq!(out.as_item().unwrap().slug, "y");
    }

    #[cfg(unix)]
    #[test]
    fn test_config_replacement_keeps_root() {
        let dir = TempDir::new().unwrap();
        let mut config = test_site_config(dir.path(), "");
        let api = api(config.clone());
        let hook = CommandHook {
            hook: Hook::AfterConfigLoad,
            command: vec!["sh".into(), "-c".into(), "sed 's/\"title\":\"Test\"/\"title\":\"Changed\"/'".into()],
            quiet: true,
        };
        let root = config.get_root().to_path_buf();
        hook.fire(&mut HookTarget::Config(&mut config), &api).unwrap();
        assert_eq!(config.site.title, "Changed");
        assert_eq!(config.get_root(), root);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_error() {
        let dir = TempDir::new().unwrap();
        let mut config = test_site_config(dir.path(), "");
        let api = api(config.clone());
        let hook = CommandHook {
            hook: Hook::BeforeBuild,
            command: vec!["sh".into(), "-c".into(), "exit 3".into()],
            quiet: true,
        };
        assert!(hook.fire(&mut HookTarget::Config(&mut config), &api).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_large_site_round_trips_through_command() {
        use crate::collection::{Collection, CollectionMap};

        let dir = TempDir::new().unwrap();
        let config = test_site_config(dir.path(), "");
        let api = api(config.clone());
        let items = (0..60)
            .map(|i| {
                let mut item = sample_item(&format!("post-{i}"));
                item.content = "<p>lorem ipsum</p>".repeat(300);
                item
            })
            .collect();
        let mut collections = CollectionMap::new();
        collections.insert(
            "posts".to_string(),
            Collection {
                name: "posts".to_string(),
                items,
                ..Default::default()
            },
        );
        let mut site = SiteData::new(config, collections);
        let before = site.collections.clone();

        let hook = CommandHook {
            hook: Hook::BeforeRender,
            command: vec!["cat".into()],
            quiet: true,
        };
        hook.fire(&mut HookTarget::Site(&mut site), &api).unwrap();
        assert_eq!(site.collections, before);
        assert_eq!(site.collections["posts"].len(), 60);
    }
}
