//! Blueprint Model
//!
//! Typed description of an app: metadata, the navigation tree and the screen
//! list. Everything here is plain data; the compiler only ever borrows it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ═══════════════════════════════════════════════════════════════════════════════
// APP METADATA
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppCategory {
    Fintech,
    Trading,
    Social,
    #[serde(rename = "E-commerce")]
    ECommerce,
    EdTech,
    HealthTech,
    #[serde(rename = "Food & Delivery")]
    FoodDelivery,
    Travel,
    Gaming,
    Entertainment,
    Productivity,
    Utility,
}

impl AppCategory {
    /// Wire spelling, as shown to the user and copied into the legacy view.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppCategory::Fintech => "Fintech",
            AppCategory::Trading => "Trading",
            AppCategory::Social => "Social",
            AppCategory::ECommerce => "E-commerce",
            AppCategory::EdTech => "EdTech",
            AppCategory::HealthTech => "HealthTech",
            AppCategory::FoodDelivery => "Food & Delivery",
            AppCategory::Travel => "Travel",
            AppCategory::Gaming => "Gaming",
            AppCategory::Entertainment => "Entertainment",
            AppCategory::Productivity => "Productivity",
            AppCategory::Utility => "Utility",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMeta {
    pub app_name: String,
    pub slug: String,
    pub owner: String,
    pub category: AppCategory,
    pub use_latest_expo: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAVIGATION TREE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigatorType {
    Stack,
    Tabs,
    Drawer,
}

impl NavigatorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigatorType::Stack => "stack",
            NavigatorType::Tabs => "tabs",
            NavigatorType::Drawer => "drawer",
        }
    }
}

/// A node of the navigation tree. Screen references are the leaves; the three
/// navigator kinds own their children, so the tree can never contain a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavNode {
    Screen(ScreenRef),
    Stack(StackNode),
    Tabs(TabsNode),
    Drawer(DrawerNode),
}

impl NavNode {
    /// Navigator kind of this node, `None` for a screen leaf.
    pub fn navigator_type(&self) -> Option<NavigatorType> {
        match self {
            NavNode::Screen(_) => None,
            NavNode::Stack(_) => Some(NavigatorType::Stack),
            NavNode::Tabs(_) => Some(NavigatorType::Tabs),
            NavNode::Drawer(_) => Some(NavigatorType::Drawer),
        }
    }

    pub fn as_screen(&self) -> Option<&ScreenRef> {
        match self {
            NavNode::Screen(screen) => Some(screen),
            _ => None,
        }
    }

    /// Short label used in diagnostics: the node id, or the referenced screen.
    pub fn label(&self) -> &str {
        match self {
            NavNode::Screen(s) => &s.screen_id,
            NavNode::Stack(s) => &s.id,
            NavNode::Tabs(t) => &t.id,
            NavNode::Drawer(d) => &d.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenRef {
    pub screen_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackNode {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_route: Option<String>,
    #[serde(default)]
    pub children: Vec<NavNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub children: Vec<TabItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    pub tab_id: String,
    pub title: String,
    pub child: NavNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub children: Vec<DrawerItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerItem {
    pub item_id: String,
    pub title: String,
    pub child: NavNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub root: NavigatorType,
    pub structure: NavNode,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCREENS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenKind {
    Auth,
    Home,
    Profile,
    List,
    Details,
    Settings,
    Chat,
    Analytics,
    Custom,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 9] = [
        ScreenKind::Auth,
        ScreenKind::Home,
        ScreenKind::Profile,
        ScreenKind::List,
        ScreenKind::Details,
        ScreenKind::Settings,
        ScreenKind::Chat,
        ScreenKind::Analytics,
        ScreenKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenKind::Auth => "auth",
            ScreenKind::Home => "home",
            ScreenKind::Profile => "profile",
            ScreenKind::List => "list",
            ScreenKind::Details => "details",
            ScreenKind::Settings => "settings",
            ScreenKind::Chat => "chat",
            ScreenKind::Analytics => "analytics",
            ScreenKind::Custom => "custom",
        }
    }

    pub fn parse(kind: &str) -> Option<ScreenKind> {
        ScreenKind::ALL.into_iter().find(|k| k.as_str() == kind)
    }
}

/// Feature flags of one screen, grouped by feature area:
/// `{"auth": {"google": true}, "home": {"charts": ["line"]}}`.
///
/// Kept as open JSON: the shape is owned by the feature registry and the
/// templates, not by the compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(pub Map<String, Value>);

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a dotted key such as `auth.google`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let (group, field) = key.split_once('.')?;
        self.0.get(group)?.as_object()?.get(field)
    }

    /// Set a dotted key, creating the group object when needed. A group that
    /// holds a non-object value is replaced.
    pub fn set(&mut self, key: &str, value: Value) {
        let Some((group, field)) = key.split_once('.') else {
            return;
        };
        let entry = self
            .0
            .entry(group.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(fields) = entry {
            fields.insert(field.to_string(), value);
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSpec {
    pub id: String,
    pub kind: ScreenKind,
    pub name: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,
}

impl ScreenSpec {
    pub fn is_auth(&self) -> bool {
        self.kind == ScreenKind::Auth
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INTEGRATIONS (informational)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthProvider {
    Firebase,
    Supabase,
    Custom,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatabaseProvider {
    Firestore,
    Supabase,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageProvider {
    FirebaseStorage,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalyticsProvider {
    Expo,
    FirebaseAnalytics,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PushProvider {
    Expo,
    Firebase,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integrations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<AuthProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<PushProvider>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// BLUEPRINT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppBlueprint {
    pub meta: AppMeta,
    pub navigation: Navigation,
    #[serde(default)]
    pub screens: Vec<ScreenSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrations: Option<Integrations>,
}
