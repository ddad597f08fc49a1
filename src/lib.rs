//! # Blueprint Compiler Ground Truth
//!
//! ## Pipeline Invariants
//!
//! 1. **Single Dispatch**: a request is a blueprint iff it carries a top-level `meta` key.
//!    The decision is made once in `request.rs` and never revisited.
//!
//! 2. **Validate Before Compile**: blueprint checks (BP001-BP003, BP006) run before the
//!    projection, output checks (BP004, BP005) before any template is loaded.
//!    All violations of a request are reported together.
//!
//! 3. **Pure Projection**: `compile` borrows the blueprint and returns a fresh `LegacyView`.
//!    Same blueprint in, structurally identical view out.
//!
//! 4. **Fixed Output Order**: app config, package manifest, app entry, root navigator,
//!    bottom tabs (tabs root only), drawer (drawer root only), shared components, then
//!    one file per screen in screen-list order. Auth screens go under `src/screens/Auth/`.
//!
//! 5. **Scoped Views**: every template sees exactly its own view. Screen templates see
//!    the screen's props with `features` merged in, nothing global.
//!
//! 6. **All Or Nothing**: a missing template or a failed render aborts the request.
//!    No partial archive is ever returned.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod archive;
pub mod blueprint;
pub mod compile;
pub mod config;
pub mod error;
pub mod flatten;
pub mod generate;
pub mod registry;
pub mod request;
pub mod store;
pub mod template;
pub mod validate;
pub mod view;
pub mod visitor;

#[cfg(test)]
mod compile_tests;

pub use archive::{ArchiveWriter, GeneratedArchive};
pub use blueprint::{AppBlueprint, FeatureFlags, NavNode, NavigatorType, ScreenKind, ScreenSpec};
pub use compile::{compile, compile_with, CompileOptions};
pub use config::GeneratorOptions;
pub use error::{GeneratorError, Result};
pub use flatten::{flatten, top_level_drawer_items, top_level_tabs, TopLevelEntry};
pub use generate::{handle_generate, GenerateResponse, Generator};
pub use request::GenerateRequest;
pub use store::{FsTemplateStore, MemoryTemplateStore, TemplateStore};
pub use validate::{validate_blueprint, validate_outputs, Violation};
pub use view::LegacyView;

// ═══════════════════════════════════════════════════════════════════════════════
// NODE BINDINGS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn to_napi_error(e: GeneratorError) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Generate the app archive for a blueprint or legacy payload.
#[cfg(feature = "napi")]
#[napi]
pub fn generate_app_native(
    payload: String,
    options_json: Option<String>,
) -> napi::Result<napi::bindgen_prelude::Buffer> {
    let options = match options_json {
        Some(json) => GeneratorOptions::from_json(&json)
            .map_err(|e| napi::Error::from_reason(format!("invalid generator options: {}", e)))?,
        None => GeneratorOptions::default(),
    };
    let generator = Generator::from_options(options);
    let archive = generator
        .generate_from_slice(payload.as_bytes())
        .map_err(to_napi_error)?;
    Ok(archive.bytes.into())
}

#[cfg(feature = "napi")]
#[napi]
pub fn compile_blueprint_native(blueprint_json: String) -> napi::Result<serde_json::Value> {
    let blueprint: AppBlueprint = serde_json::from_str(&blueprint_json)
        .map_err(|e| to_napi_error(GeneratorError::InvalidPayload(e)))?;
    let violations = validate_blueprint(&blueprint, Default::default());
    if !violations.is_empty() {
        return Err(to_napi_error(GeneratorError::MalformedBlueprint { violations }));
    }
    serde_json::to_value(compile(&blueprint)).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn feature_registry_native(kind: String) -> napi::Result<serde_json::Value> {
    let kind = ScreenKind::parse(&kind)
        .ok_or_else(|| napi::Error::from_reason(format!("unknown screen kind \"{}\"", kind)))?;
    serde_json::to_value(registry::features_for(kind))
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}
