//! Navigation Flattener
//!
//! Reduces the navigation tree to the flat sequences the legacy view needs:
//! every reachable screen id in depth-first order, and one routable entry per
//! top-level tab or drawer item.

use std::collections::HashSet;

use crate::blueprint::{DrawerNode, NavNode, ScreenRef, TabsNode};
use crate::visitor::NavVisitor;

/// A top-level tab or drawer entry: the label shown to the user and the route
/// it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelEntry {
    pub label: String,
    pub route: String,
}

struct ScreenCollector<'a, 'x> {
    ids: Vec<&'a str>,
    exclude: Option<&'x HashSet<&'x str>>,
    first_only: bool,
}

impl<'a, 'x> ScreenCollector<'a, 'x> {
    fn new(exclude: Option<&'x HashSet<&'x str>>, first_only: bool) -> Self {
        Self {
            ids: Vec::new(),
            exclude,
            first_only,
        }
    }

    fn done(&self) -> bool {
        self.first_only && !self.ids.is_empty()
    }
}

impl<'a, 'x> NavVisitor<'a> for ScreenCollector<'a, 'x> {
    fn visit_node(&mut self, node: &'a NavNode) {
        if self.done() {
            return;
        }
        crate::visitor::walk_node(self, node);
    }

    fn visit_screen(&mut self, screen: &'a ScreenRef) {
        let id = screen.screen_id.as_str();
        if self.exclude.is_some_and(|ex| ex.contains(id)) {
            return;
        }
        self.ids.push(id);
    }
}

/// Every screen id reachable under `node`, depth-first, left to right.
/// Duplicates are kept; callers that need a set deduplicate themselves.
pub fn flatten(node: &NavNode) -> Vec<&str> {
    let mut collector = ScreenCollector::new(None, false);
    collector.visit_node(node);
    collector.ids
}

/// First screen id under `node` that is not in `exclude`.
fn first_screen<'a>(node: &'a NavNode, exclude: &HashSet<&str>) -> Option<&'a str> {
    let mut collector = ScreenCollector::new(Some(exclude), true);
    collector.visit_node(node);
    collector.ids.first().copied()
}

fn resolve_entry(label: &str, fallback_id: &str, child: &NavNode, exclude: &HashSet<&str>) -> TopLevelEntry {
    // A tab wrapping a whole subtree is routed to its first screen only.
    // Subtrees without screens fall back to the item's own id, which older
    // templates rely on.
    let route = first_screen(child, exclude).unwrap_or(fallback_id);
    TopLevelEntry {
        label: label.to_string(),
        route: route.to_string(),
    }
}

pub fn top_level_tabs(tabs: &TabsNode) -> Vec<TopLevelEntry> {
    top_level_tabs_excluding(tabs, &HashSet::new())
}

/// Like [`top_level_tabs`], skipping screens in `exclude` when resolving
/// each tab's route.
pub fn top_level_tabs_excluding(tabs: &TabsNode, exclude: &HashSet<&str>) -> Vec<TopLevelEntry> {
    tabs.children
        .iter()
        .map(|tab| resolve_entry(&tab.title, &tab.tab_id, &tab.child, exclude))
        .collect()
}

pub fn top_level_drawer_items(drawer: &DrawerNode) -> Vec<TopLevelEntry> {
    top_level_drawer_items_excluding(drawer, &HashSet::new())
}

pub fn top_level_drawer_items_excluding(
    drawer: &DrawerNode,
    exclude: &HashSet<&str>,
) -> Vec<TopLevelEntry> {
    drawer
        .children
        .iter()
        .map(|item| resolve_entry(&item.title, &item.item_id, &item.child, exclude))
        .collect()
}

/// Deduplicate, keeping each id at its first-seen position.
pub fn dedup_preserving_order<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
