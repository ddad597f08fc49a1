#[cfg(test)]
mod tests {
    use crate::blueprint::AppBlueprint;
    use crate::compile::{compile, compile_with, CompileOptions};
    use crate::view::{NavEntry, ScreenType};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn blueprint(navigation: Value, screens: Value) -> AppBlueprint {
        serde_json::from_value(json!({
            "meta": {
                "appName": "Pocket Bank",
                "slug": "pocket-bank",
                "owner": "acme",
                "category": "Fintech",
                "useLatestExpo": true
            },
            "navigation": navigation,
            "screens": screens
        }))
        .unwrap()
    }

    fn screen(id: &str, kind: &str) -> Value {
        json!({ "id": id, "kind": kind, "name": id, "template": format!("{}Screen.js", id) })
    }

    fn nav(name: &str) -> NavEntry {
        NavEntry {
            name: name.to_string(),
            route: name.to_string(),
        }
    }

    fn tabs_blueprint() -> AppBlueprint {
        blueprint(
            json!({
                "root": "tabs",
                "structure": {
                    "type": "tabs", "id": "main",
                    "children": [
                        { "tabId": "home-tab", "title": "Home", "child": { "type": "screen", "screenId": "Home" } },
                        { "tabId": "settings-tab", "title": "Settings", "child": { "type": "screen", "screenId": "Settings" } }
                    ]
                }
            }),
            json!([
                screen("Login", "auth"),
                screen("Home", "home"),
                screen("Settings", "settings")
            ]),
        )
    }

    #[test]
    fn test_tabs_app_end_to_end() {
        let view = compile(&tabs_blueprint());

        assert_eq!(view.app_name, "Pocket Bank");
        assert_eq!(view.slug, "pocket-bank");
        assert_eq!(view.owner, "acme");
        assert!(view.use_latest_expo);
        assert_eq!(view.app_category.as_deref(), Some("Fintech"));

        assert!(view.navigation.has_bottom_tabs);
        assert!(!view.navigation.has_drawer);
        assert_eq!(view.navigation.tabs, vec![nav("Home"), nav("Settings")]);
        assert_eq!(view.navigation.stack, vec![nav("Home"), nav("Settings")]);
        assert!(view.navigation.drawer_items.is_empty());

        assert_eq!(view.screens.len(), 3);
        let auth: Vec<_> = view.screens.iter().filter(|s| s.is_auth()).collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0].name, "Login");
        assert_eq!(view.screens[1].screen_type, ScreenType::Stack);
    }

    #[test]
    fn test_compile_is_deterministic_and_pure() {
        let bp = tabs_blueprint();
        let before = serde_json::to_string(&bp).unwrap();

        let first = serde_json::to_string(&compile(&bp)).unwrap();
        let second = serde_json::to_string(&compile(&bp)).unwrap();

        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(&bp).unwrap(), before);
    }

    #[test]
    fn test_stack_is_deduplicated_in_first_seen_order() {
        let bp = blueprint(
            json!({
                "root": "stack",
                "structure": {
                    "type": "stack", "id": "root",
                    "children": [
                        { "type": "screen", "screenId": "Feed" },
                        { "type": "screen", "screenId": "Post" },
                        { "type": "stack", "id": "nested", "children": [
                            { "type": "screen", "screenId": "Feed" },
                            { "type": "screen", "screenId": "Profile" }
                        ] }
                    ]
                }
            }),
            json!([screen("Feed", "list"), screen("Post", "details"), screen("Profile", "profile")]),
        );

        let view = compile(&bp);
        assert!(!view.navigation.has_bottom_tabs);
        assert!(view.navigation.tabs.is_empty());
        assert_eq!(
            view.navigation.stack,
            vec![nav("Feed"), nav("Post"), nav("Profile")]
        );
    }

    #[test]
    fn test_auth_screens_never_routed() {
        let bp = blueprint(
            json!({
                "root": "drawer",
                "structure": {
                    "type": "drawer", "id": "side",
                    "children": [
                        { "itemId": "account", "title": "Account", "child": {
                            "type": "stack", "id": "acct",
                            "children": [
                                { "type": "screen", "screenId": "Login" },
                                { "type": "screen", "screenId": "Profile" }
                            ]
                        } },
                        { "itemId": "signin", "title": "Sign in", "child": { "type": "screen", "screenId": "Login" } }
                    ]
                }
            }),
            json!([screen("Login", "auth"), screen("Profile", "profile")]),
        );

        let view = compile(&bp);
        assert!(view.navigation.has_drawer);
        assert_eq!(view.navigation.stack, vec![nav("Profile")]);
        assert_eq!(
            view.navigation.drawer_items,
            vec![
                NavEntry { name: "Account".to_string(), route: "Profile".to_string() },
                NavEntry { name: "Sign in".to_string(), route: "signin".to_string() },
            ]
        );
    }

    #[test]
    fn test_features_merged_over_props() {
        let bp = blueprint(
            json!({
                "root": "stack",
                "structure": { "type": "stack", "id": "root", "children": [{ "type": "screen", "screenId": "Home" }] }
            }),
            json!([{
                "id": "Home", "kind": "home", "name": "Home", "template": "HomeScreen.js",
                "props": { "greeting": "hi", "features": "overwritten" },
                "features": { "home": { "search": true } }
            }]),
        );

        let view = compile(&bp);
        let props = &view.screens[0].props;
        assert_eq!(props["greeting"], json!("hi"));
        assert_eq!(props["features"], json!({ "home": { "search": true } }));
    }

    #[test]
    fn test_screen_without_features_gets_empty_object() {
        let view = compile(&tabs_blueprint());
        assert_eq!(view.screens[0].props["features"], json!({}));
    }

    #[test]
    fn test_feature_defaults_are_opt_in() {
        let bp = blueprint(
            json!({
                "root": "stack",
                "structure": { "type": "stack", "id": "root", "children": [{ "type": "screen", "screenId": "Home" }] }
            }),
            json!([{
                "id": "Home", "kind": "home", "name": "Home", "template": "HomeScreen.js",
                "features": { "home": { "welcomeHeader": false } }
            }]),
        );

        let plain = compile(&bp);
        assert_eq!(
            plain.screens[0].props["features"],
            json!({ "home": { "welcomeHeader": false } })
        );

        let filled = compile_with(&bp, CompileOptions { apply_feature_defaults: true });
        let features = &filled.screens[0].props["features"]["home"];
        assert_eq!(features["welcomeHeader"], json!(false));
        assert_eq!(features["metricCards"], json!(true));
        assert_eq!(features["charts"], json!(["line"]));
        assert!(features.get("search").is_none());
    }

    #[test]
    fn test_tabs_structure_under_stack_root_is_ignored() {
        // Only the declared root decides which navigator lists are filled.
        let mut bp = tabs_blueprint();
        bp.navigation.root = crate::blueprint::NavigatorType::Stack;

        let view = compile(&bp);
        assert!(!view.navigation.has_bottom_tabs);
        assert!(view.navigation.tabs.is_empty());
        assert_eq!(view.navigation.stack, vec![nav("Home"), nav("Settings")]);
    }
}
