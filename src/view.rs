//! Legacy view and per-template views
//!
//! `LegacyView` is the flat representation the renderer consumes. It is also
//! the wire shape of pre-blueprint requests, so every navigation field
//! tolerates being absent.
//!
//! The remaining structs are the exact views handed to each template family.
//! Templates never see more than their view declares.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ═══════════════════════════════════════════════════════════════════════════════
// LEGACY VIEW
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub name: String,
    pub route: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyNavigation {
    pub has_bottom_tabs: bool,
    pub tabs: Vec<NavEntry>,
    pub stack: Vec<NavEntry>,
    pub has_drawer: bool,
    pub drawer_items: Vec<NavEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenType {
    Auth,
    Stack,
    Tab,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyScreen {
    #[serde(rename = "type")]
    pub screen_type: ScreenType,
    pub name: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub props: Map<String, Value>,
}

impl LegacyScreen {
    pub fn is_auth(&self) -> bool {
        self.screen_type == ScreenType::Auth
    }

    /// Archive path of the rendered screen. Auth screens live in their own
    /// folder so the root navigator can mount them outside the main stack.
    pub fn output_path(&self) -> String {
        if self.is_auth() {
            format!("src/screens/Auth/{}.js", self.name)
        } else {
            format!("src/screens/{}.js", self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyView {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub use_latest_expo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_category: Option<String>,
    #[serde(default)]
    pub navigation: LegacyNavigation,
    #[serde(default)]
    pub screens: Vec<LegacyScreen>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPLATE VIEWS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigView<'a> {
    pub app_name: &'a str,
    pub slug: &'a str,
    pub owner: &'a str,
    pub use_latest_expo: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifestView<'a> {
    pub slug: &'a str,
    pub app_name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEntryView<'a> {
    pub app_name: &'a str,
}

/// Shared by the root navigator, bottom tabs and drawer templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorView<'a> {
    pub has_bottom_tabs: bool,
    pub tabs: &'a [NavEntry],
    pub stack: &'a [NavEntry],
    pub has_drawer: bool,
    pub drawer_items: &'a [NavEntry],
    pub auth_screens: Vec<NavEntry>,
}

impl<'a> NavigatorView<'a> {
    pub fn from_legacy(view: &'a LegacyView) -> Self {
        let auth_screens = view
            .screens
            .iter()
            .filter(|s| s.is_auth())
            .map(|s| NavEntry {
                name: s.name.clone(),
                route: s.name.clone(),
            })
            .collect();

        NavigatorView {
            has_bottom_tabs: view.navigation.has_bottom_tabs,
            tabs: &view.navigation.tabs,
            stack: &view.navigation.stack,
            has_drawer: view.navigation.has_drawer,
            drawer_items: &view.navigation.drawer_items,
            auth_screens,
        }
    }
}

/// Shared UI components take no data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentView {}

impl<'a> AppConfigView<'a> {
    pub fn from_legacy(view: &'a LegacyView) -> Self {
        AppConfigView {
            app_name: &view.app_name,
            slug: &view.slug,
            owner: &view.owner,
            use_latest_expo: view.use_latest_expo,
        }
    }
}

impl<'a> PackageManifestView<'a> {
    pub fn from_legacy(view: &'a LegacyView) -> Self {
        PackageManifestView {
            slug: &view.slug,
            app_name: &view.app_name,
        }
    }
}

impl<'a> AppEntryView<'a> {
    pub fn from_legacy(view: &'a LegacyView) -> Self {
        AppEntryView {
            app_name: &view.app_name,
        }
    }
}
