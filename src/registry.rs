//! Feature Registry
//!
//! Static table of the feature options each screen kind exposes to the form
//! UI. The compiler never branches on it; it is only used to validate feature
//! flags and to fill in defaults.

use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::blueprint::{FeatureFlags, ScreenKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "lowercase")]
pub enum Control {
    Checkbox {
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<bool>,
    },
    Multi {
        options: Vec<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<Vec<&'static str>>,
    },
    Select {
        options: Vec<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<&'static str>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureOption {
    /// Dotted path into the screen's feature flags, e.g. `auth.google`.
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub control: Control,
}

impl FeatureOption {
    pub fn default_value(&self) -> Option<Value> {
        match &self.control {
            Control::Checkbox { default } => default.map(Value::Bool),
            Control::Multi { default, .. } => default
                .as_ref()
                .map(|d| Value::Array(d.iter().map(|s| Value::from(*s)).collect())),
            Control::Select { default, .. } => default.map(Value::from),
        }
    }

    /// Describe why `value` is not acceptable for this option, if it is not.
    pub fn check(&self, value: &Value) -> Option<String> {
        match &self.control {
            Control::Checkbox { .. } => {
                if value.is_boolean() {
                    None
                } else {
                    Some(format!("expected a boolean, got {}", value))
                }
            }
            Control::Select { options, .. } => match value.as_str() {
                Some(s) if options.contains(&s) => None,
                Some(s) => Some(format!(
                    "\"{}\" is not one of [{}]",
                    s,
                    options.join(", ")
                )),
                None => Some(format!("expected a string, got {}", value)),
            },
            Control::Multi { options, .. } => {
                let Some(items) = value.as_array() else {
                    return Some(format!("expected a list, got {}", value));
                };
                let invalid: Vec<String> = items
                    .iter()
                    .filter(|item| !item.as_str().is_some_and(|s| options.contains(&s)))
                    .map(|item| item.to_string())
                    .collect();
                if invalid.is_empty() {
                    None
                } else {
                    Some(format!(
                        "{} not in [{}]",
                        invalid.join(", "),
                        options.join(", ")
                    ))
                }
            }
        }
    }
}

fn checkbox(key: &'static str, label: &'static str, default: Option<bool>) -> FeatureOption {
    FeatureOption {
        key,
        label,
        control: Control::Checkbox { default },
    }
}

fn multi(
    key: &'static str,
    label: &'static str,
    options: &[&'static str],
    default: Option<&[&'static str]>,
) -> FeatureOption {
    FeatureOption {
        key,
        label,
        control: Control::Multi {
            options: options.to_vec(),
            default: default.map(|d| d.to_vec()),
        },
    }
}

fn select(
    key: &'static str,
    label: &'static str,
    options: &[&'static str],
    default: Option<&'static str>,
) -> FeatureOption {
    FeatureOption {
        key,
        label,
        control: Control::Select {
            options: options.to_vec(),
            default,
        },
    }
}

const CHART_TYPES: &[&str] = &["line", "bar", "pie", "area"];

lazy_static! {
    static ref FEATURE_REGISTRY: HashMap<ScreenKind, Vec<FeatureOption>> = {
        let mut m = HashMap::new();
        m.insert(ScreenKind::Auth, vec![
            checkbox("auth.emailPassword", "Email + Password", Some(true)),
            checkbox("auth.google", "Google Sign-In", None),
            checkbox("auth.apple", "Apple Sign-In", None),
            checkbox("auth.phoneOtp", "Phone OTP", None),
            checkbox("auth.magicLink", "Magic Link", None),
            checkbox("auth.rememberMe", "Remember me", Some(true)),
            checkbox("auth.forgotPassword", "Forgot password", Some(true)),
            select("auth.socialButtonsLayout", "Social layout", &["row", "column"], Some("row")),
        ]);
        m.insert(ScreenKind::Home, vec![
            checkbox("home.welcomeHeader", "Welcome header", Some(true)),
            checkbox("home.metricCards", "Metric cards", Some(true)),
            multi("home.charts", "Charts", CHART_TYPES, Some(&["line"])),
            checkbox("home.recentActivityList", "Recent activity", None),
            checkbox("home.quickActions", "Quick actions", None),
            checkbox("home.search", "Search bar", None),
            checkbox("home.notificationsBell", "Notifications bell", None),
        ]);
        m.insert(ScreenKind::Profile, vec![
            checkbox("profile.avatarUpload", "Avatar upload", Some(true)),
            checkbox("profile.bio", "Bio field", Some(true)),
            checkbox("profile.location", "Location", None),
            multi("profile.socials", "Social links", &["twitter", "instagram", "linkedin", "website"], None),
            checkbox("profile.editButton", "Edit button", Some(true)),
            checkbox("profile.settingsShortcut", "Settings shortcut", None),
        ]);
        m.insert(ScreenKind::Settings, vec![
            checkbox("settings.themeToggle", "Theme toggle", Some(true)),
            checkbox("settings.languagePicker", "Language picker", None),
            checkbox("settings.pushToggle", "Push notifications", None),
            multi("settings.privacyToggles", "Privacy toggles", &["privateProfile", "hideAge", "readReceipts"], None),
        ]);
        // Analytics screens reuse the home chart group.
        m.insert(ScreenKind::Analytics, vec![
            multi("home.charts", "Charts", CHART_TYPES, Some(&["bar"])),
        ]);
        m.insert(ScreenKind::List, vec![
            checkbox("list.search", "Search", Some(true)),
            checkbox("list.filters", "Filters", None),
            select("list.pagination", "Pagination", &["infinite", "paged"], Some("infinite")),
        ]);
        m.insert(ScreenKind::Details, vec![
            checkbox("details.share", "Share button", None),
        ]);
        m.insert(ScreenKind::Chat, vec![
            checkbox("chat.attachments", "Attachments", Some(true)),
            checkbox("chat.imagePreview", "Image preview", Some(true)),
            checkbox("chat.multipleImages", "Multiple images", None),
            checkbox("chat.typingIndicator", "Typing indicator", None),
        ]);
        m.insert(ScreenKind::Custom, vec![]);
        m
    };
}

/// Feature options configurable for `kind`, in form order.
pub fn features_for(kind: ScreenKind) -> &'static [FeatureOption] {
    FEATURE_REGISTRY
        .get(&kind)
        .map(|options| options.as_slice())
        .unwrap_or(&[])
}

/// A feature flag whose value does not fit the registry entry for its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureIssue {
    pub key: &'static str,
    pub reason: String,
}

/// Check every registered option of `kind` that is present in `flags`.
/// Keys the registry does not know are accepted as-is.
pub fn check_features(kind: ScreenKind, flags: &FeatureFlags) -> Vec<FeatureIssue> {
    features_for(kind)
        .iter()
        .filter_map(|option| {
            let value = flags.get(option.key)?;
            option.check(value).map(|reason| FeatureIssue {
                key: option.key,
                reason,
            })
        })
        .collect()
}

/// Return `flags` completed with the registry defaults of `kind`. Values the
/// user set, including explicit `false`, are never replaced.
pub fn with_defaults(kind: ScreenKind, flags: &FeatureFlags) -> FeatureFlags {
    let mut completed = flags.clone();
    for option in features_for(kind) {
        if completed.get(option.key).is_some() {
            continue;
        }
        if let Some(default) = option.default_value() {
            completed.set(option.key, default);
        }
    }
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flags(value: Value) -> FeatureFlags {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_every_kind_is_registered() {
        for kind in ScreenKind::ALL {
            assert!(FEATURE_REGISTRY.contains_key(&kind), "{:?} missing", kind);
        }
        assert!(features_for(ScreenKind::Custom).is_empty());
        assert_eq!(features_for(ScreenKind::Auth).len(), 8);
    }

    #[test]
    fn test_check_features_reports_bad_values() {
        let f = flags(json!({
            "auth": { "google": "yes", "socialButtonsLayout": "grid", "emailPassword": true }
        }));
        let issues = check_features(ScreenKind::Auth, &f);
        let keys: Vec<&str> = issues.iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["auth.google", "auth.socialButtonsLayout"]);
        assert!(issues[1].reason.contains("row, column"));
    }

    #[test]
    fn test_check_features_multi() {
        let ok = flags(json!({ "home": { "charts": ["line", "pie"] } }));
        assert!(check_features(ScreenKind::Home, &ok).is_empty());

        let bad = flags(json!({ "home": { "charts": ["line", "radar"] } }));
        let issues = check_features(ScreenKind::Home, &bad);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].reason.contains("\"radar\""));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let f = flags(json!({ "payments": { "stripe": true }, "auth": { "anonymous": 3 } }));
        assert!(check_features(ScreenKind::Auth, &f).is_empty());
    }

    #[test]
    fn test_with_defaults_keeps_user_values() {
        let f = flags(json!({ "auth": { "emailPassword": false } }));
        let completed = with_defaults(ScreenKind::Auth, &f);
        assert_eq!(completed.get("auth.emailPassword"), Some(&json!(false)));
        assert_eq!(completed.get("auth.rememberMe"), Some(&json!(true)));
        assert_eq!(completed.get("auth.socialButtonsLayout"), Some(&json!("row")));
        // No default registered, so the key stays unset.
        assert_eq!(completed.get("auth.google"), None);
    }

    #[test]
    fn test_analytics_defaults_use_home_group() {
        let completed = with_defaults(ScreenKind::Analytics, &FeatureFlags::new());
        assert_eq!(completed.to_value(), json!({ "home": { "charts": ["bar"] } }));
    }
}
