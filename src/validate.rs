//! Blueprint Validation
//!
//! Structural checks run before compilation. Each failed check is reported as
//! a [`Violation`] carrying a stable code and the guarantee it protects, and
//! all violations of a request are reported together.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::blueprint::{AppBlueprint, ScreenRef};
use crate::registry;
use crate::view::LegacyView;
use crate::visitor::NavVisitor;

// ═══════════════════════════════════════════════════════════════════════════════
// INVARIANT CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const INV_ROOT_MISMATCH: &str = "BP001";
pub const INV_DANGLING_REFERENCE: &str = "BP002";
pub const INV_DUPLICATE_SCREEN_ID: &str = "BP003";
pub const INV_DUPLICATE_OUTPUT: &str = "BP004";
pub const INV_UNSAFE_PATH: &str = "BP005";
pub const INV_FEATURE_VALUE: &str = "BP006";

fn get_guarantee(code: &str) -> &'static str {
    match code {
        INV_ROOT_MISMATCH => "The declared root navigator is the type of the navigation structure.",
        INV_DANGLING_REFERENCE => "Every screen in the navigation tree has a rendered screen file.",
        INV_DUPLICATE_SCREEN_ID => "Screen ids identify exactly one screen.",
        INV_DUPLICATE_OUTPUT => "Every generated file is written exactly once.",
        INV_UNSAFE_PATH => {
            "Templates are read from, and screens written to, their own directories only."
        }
        INV_FEATURE_VALUE => "Feature flags hold values the feature registry allows.",
        _ => "Unknown invariant.",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub code: String,
    pub message: String,
    pub guarantee: String,
}

impl Violation {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Violation {
            code: code.to_string(),
            message: message.into(),
            guarantee: get_guarantee(code).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Accept tree references to screens that do not exist, as the legacy
    /// generator did. The route is still emitted, with no screen file behind it.
    pub allow_dangling_references: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// BLUEPRINT CHECKS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct ReferenceCollector<'a> {
    refs: Vec<&'a str>,
}

impl<'a> NavVisitor<'a> for ReferenceCollector<'a> {
    fn visit_screen(&mut self, screen: &'a ScreenRef) {
        self.refs.push(&screen.screen_id);
    }
}

/// Check the blueprint-level invariants (BP001, BP002, BP003, BP006).
pub fn validate_blueprint(blueprint: &AppBlueprint, options: ValidationOptions) -> Vec<Violation> {
    let mut violations = Vec::new();
    let nav = &blueprint.navigation;

    match nav.structure.navigator_type() {
        Some(actual) if actual == nav.root => {}
        Some(actual) => violations.push(Violation::new(
            INV_ROOT_MISMATCH,
            format!(
                "navigation.root is \"{}\" but structure is a \"{}\" node",
                nav.root.as_str(),
                actual.as_str()
            ),
        )),
        None => violations.push(Violation::new(
            INV_ROOT_MISMATCH,
            format!(
                "navigation.root is \"{}\" but structure is a bare screen reference \"{}\"",
                nav.root.as_str(),
                nav.structure.label()
            ),
        )),
    }

    let mut seen_ids = HashSet::new();
    let mut duplicate_ids = Vec::new();
    for screen in &blueprint.screens {
        if !seen_ids.insert(screen.id.as_str()) && !duplicate_ids.contains(&screen.id.as_str()) {
            duplicate_ids.push(screen.id.as_str());
        }
    }
    if !duplicate_ids.is_empty() {
        violations.push(Violation::new(
            INV_DUPLICATE_SCREEN_ID,
            format!("duplicate screen ids: {}", duplicate_ids.join(", ")),
        ));
    }

    if !options.allow_dangling_references {
        let mut collector = ReferenceCollector::default();
        collector.visit_node(&nav.structure);

        let mut missing: Vec<&str> = Vec::new();
        for id in collector.refs {
            if !seen_ids.contains(id) && !missing.contains(&id) {
                missing.push(id);
            }
        }
        if !missing.is_empty() {
            violations.push(Violation::new(
                INV_DANGLING_REFERENCE,
                format!(
                    "navigation references unknown screens: {}",
                    missing.join(", ")
                ),
            ));
        }
    }

    for screen in &blueprint.screens {
        let Some(features) = &screen.features else {
            continue;
        };
        for issue in registry::check_features(screen.kind, features) {
            violations.push(Violation::new(
                INV_FEATURE_VALUE,
                format!("screen \"{}\": {} {}", screen.id, issue.key, issue.reason),
            ));
        }
    }

    violations
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT CHECKS
// ═══════════════════════════════════════════════════════════════════════════════

/// A single path segment or relative path that stays inside its directory.
fn is_contained_path(path: &str, allow_nested: bool) -> bool {
    if path.trim().is_empty() || path.starts_with('/') || path.contains('\\') {
        return false;
    }
    if !allow_nested && path.contains('/') {
        return false;
    }
    path.split('/').all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Check the output-level invariants (BP004, BP005) of a view about to be
/// rendered. Applies to compiled blueprints and legacy requests alike.
pub fn validate_outputs(view: &LegacyView) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut owners: HashMap<String, Vec<&str>> = HashMap::new();
    let mut order = Vec::new();
    for screen in &view.screens {
        if !is_contained_path(&screen.name, false) {
            violations.push(Violation::new(
                INV_UNSAFE_PATH,
                format!("screen name \"{}\" is not a plain file name", screen.name),
            ));
            continue;
        }
        if !is_contained_path(&screen.template, true) {
            violations.push(Violation::new(
                INV_UNSAFE_PATH,
                format!(
                    "screen \"{}\" uses template \"{}\" outside the screens directory",
                    screen.name, screen.template
                ),
            ));
        }

        let path = screen.output_path();
        if !owners.contains_key(&path) {
            order.push(path.clone());
        }
        owners.entry(path).or_default().push(&screen.name);
    }

    for path in order {
        let names = &owners[&path];
        if names.len() > 1 {
            violations.push(Violation::new(
                INV_DUPLICATE_OUTPUT,
                format!(
                    "duplicate screen name: {} screens would be written to {}",
                    names.len(),
                    path
                ),
            ));
        }
    }

    violations
}
