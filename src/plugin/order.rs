//! Plugin execution order.
//!
//! With an explicit `plugins.order`, listed plugins come first in that order
//! and the rest follow in discovery order. Otherwise a depth-first walk
//! places each plugin after its dependencies.
//!
//! Missing dependencies and cycles are logged, never fatal. A cycle is cut
//! at the edge that closes it, so the resulting order inside a cycle is
//! whatever the walk reached first.

use rustc_hash::{FxHashMap, FxHashSet};

use super::LoadedPlugin;
use crate::log;

/// Order `plugins` for registration.
pub fn order_plugins(plugins: Vec<LoadedPlugin>, explicit: &[String]) -> Vec<LoadedPlugin> {
    let indices = if explicit.is_empty() {
        dependency_order(&plugins)
    } else {
        explicit_order(&plugins, explicit)
    };

    let mut slots: Vec<Option<LoadedPlugin>> = plugins.into_iter().map(Some).collect();
    indices
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}

fn name_index(plugins: &[LoadedPlugin]) -> FxHashMap<&str, usize> {
    plugins
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.name(), idx))
        .collect()
}

fn explicit_order(plugins: &[LoadedPlugin], explicit: &[String]) -> Vec<usize> {
    let by_name = name_index(plugins);
    let mut placed = FxHashSet::default();
    let mut out = Vec::with_capacity(plugins.len());

    for name in explicit {
        match by_name.get(name.as_str()) {
            Some(&idx) => {
                if placed.insert(idx) {
                    out.push(idx);
                }
            }
            None => log!("warning"; "plugins.order names `{}`, which is not loaded", name),
        }
    }
    out.extend((0..plugins.len()).filter(|idx| !placed.contains(idx)));
    out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

fn dependency_order(plugins: &[LoadedPlugin]) -> Vec<usize> {
    let by_name = name_index(plugins);
    let deps: Vec<Vec<String>> = plugins.iter().map(|p| p.plugin.dependencies()).collect();
    let mut marks = vec![Mark::Unvisited; plugins.len()];
    let mut out = Vec::with_capacity(plugins.len());

    for idx in 0..plugins.len() {
        visit(idx, plugins, &deps, &by_name, &mut marks, &mut out);
    }
    out
}

fn visit(
    idx: usize,
    plugins: &[LoadedPlugin],
    deps: &[Vec<String>],
    by_name: &FxHashMap<&str, usize>,
    marks: &mut [Mark],
    out: &mut Vec<usize>,
) {
    if marks[idx] != Mark::Unvisited {
        return;
    }
    marks[idx] = Mark::Visiting;

    for dep in &deps[idx] {
        match by_name.get(dep.as_str()) {
            Some(&dep_idx) if marks[dep_idx] == Mark::Visiting => {
                log!(
                    "warning";
                    "circular plugin dependency: `{}` -> `{}`",
                    plugins[idx].name(),
                    dep
                );
            }
            Some(&dep_idx) => visit(dep_idx, plugins, deps, by_name, marks, out),
            None => log!(
                "warning";
                "plugin `{}` depends on `{}`, which is not loaded",
                plugins[idx].name(),
                dep
            ),
        }
    }

    marks[idx] = Mark::Done;
    out.push(idx);
}
