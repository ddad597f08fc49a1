//! Legacy-View Compiler
//!
//! Projects a blueprint onto the flat view the renderer understands. The
//! projection is pure: same blueprint in, same view out, input untouched.

use serde_json::Value;
use std::collections::HashSet;

use crate::blueprint::{AppBlueprint, FeatureFlags, NavNode, NavigatorType, ScreenSpec};
use crate::flatten::{
    dedup_preserving_order, flatten, top_level_drawer_items_excluding, top_level_tabs_excluding,
    TopLevelEntry,
};
use crate::registry;
use crate::view::{LegacyNavigation, LegacyScreen, LegacyView, NavEntry, ScreenType};

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Complete each screen's feature flags with the registry defaults.
    pub apply_feature_defaults: bool,
}

pub fn compile(blueprint: &AppBlueprint) -> LegacyView {
    compile_with(blueprint, CompileOptions::default())
}

pub fn compile_with(blueprint: &AppBlueprint, options: CompileOptions) -> LegacyView {
    let meta = &blueprint.meta;
    let nav = &blueprint.navigation;

    let auth_ids: HashSet<&str> = blueprint
        .screens
        .iter()
        .filter(|s| s.is_auth())
        .map(|s| s.id.as_str())
        .collect();

    let has_bottom_tabs = nav.root == NavigatorType::Tabs;
    let has_drawer = nav.root == NavigatorType::Drawer;

    let tabs = match &nav.structure {
        NavNode::Tabs(tabs) if has_bottom_tabs => {
            to_nav_entries(top_level_tabs_excluding(tabs, &auth_ids))
        }
        _ => Vec::new(),
    };

    let drawer_items = match &nav.structure {
        NavNode::Drawer(drawer) if has_drawer => {
            to_nav_entries(top_level_drawer_items_excluding(drawer, &auth_ids))
        }
        _ => Vec::new(),
    };

    // Auth screens are mounted outside the main stack, never as stack routes.
    let stack = dedup_preserving_order(flatten(&nav.structure))
        .into_iter()
        .filter(|id| !auth_ids.contains(id))
        .map(|id| NavEntry {
            name: id.to_string(),
            route: id.to_string(),
        })
        .collect();

    let screens = blueprint
        .screens
        .iter()
        .map(|screen| project_screen(screen, options))
        .collect();

    LegacyView {
        app_name: meta.app_name.clone(),
        slug: meta.slug.clone(),
        owner: meta.owner.clone(),
        use_latest_expo: meta.use_latest_expo,
        app_category: Some(meta.category.as_str().to_string()),
        navigation: LegacyNavigation {
            has_bottom_tabs,
            tabs,
            stack,
            has_drawer,
            drawer_items,
        },
        screens,
    }
}

fn to_nav_entries(entries: Vec<TopLevelEntry>) -> Vec<NavEntry> {
    entries
        .into_iter()
        .map(|e| NavEntry {
            name: e.label,
            route: e.route,
        })
        .collect()
}

/// One screen as the renderer sees it. `props` and `features` are merged into
/// a single bag; `features` always wins over a prop of the same name.
fn project_screen(screen: &ScreenSpec, options: CompileOptions) -> LegacyScreen {
    let features = match (&screen.features, options.apply_feature_defaults) {
        (Some(f), true) => registry::with_defaults(screen.kind, f),
        (None, true) => registry::with_defaults(screen.kind, &FeatureFlags::new()),
        (Some(f), false) => f.clone(),
        (None, false) => FeatureFlags::new(),
    };

    let mut props = screen.props.clone().unwrap_or_default();
    props.insert("features".to_string(), Value::Object(features.0));

    LegacyScreen {
        screen_type: if screen.is_auth() {
            ScreenType::Auth
        } else {
            ScreenType::Stack
        },
        name: screen.name.clone(),
        template: screen.template.clone(),
        title: screen.title.clone(),
        props,
    }
}
