//! Generation Pipeline
//!
//! Turns a request into a zip archive:
//!
//! 1. resolve the request into a `LegacyView` (validate, then compile blueprints)
//! 2. plan every output file in a fixed order, each with its own typed view
//! 3. load all templates in plan order, failing on the first one missing
//! 4. render (optionally on the rayon pool) and insert results in plan order
//!
//! Nothing is returned unless every file rendered.

use rayon::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::archive::{ArchiveWriter, GeneratedArchive};
use crate::compile::compile_with;
use crate::config::GeneratorOptions;
use crate::error::{GeneratorError, Result};
use crate::request::GenerateRequest;
use crate::store::{FsTemplateStore, TemplateStore};
use crate::template::{Delimiters, Template};
use crate::validate::{validate_blueprint, validate_outputs};
use crate::view::{
    AppConfigView, AppEntryView, ComponentView, LegacyView, NavigatorView, PackageManifestView,
};

const TEMPLATES_DIR: &str = "lib/templates-appjs";
const BUILDER_TEMPLATES_DIR: &str = "lib/builder/templates-appjs";

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPLATE IDENTIFIERS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateId {
    AppConfig,
    PackageManifest,
    AppEntry,
    RootNavigator,
    BottomTabs,
    Drawer,
    GlobalButton,
    GlobalTextInput,
    /// A screen template, named by the screen's `template` field.
    Screen(String),
}

impl TemplateId {
    /// Logical name used in error messages.
    pub fn name(&self) -> String {
        match self {
            TemplateId::AppConfig => "app.config.js.mustache".to_string(),
            TemplateId::PackageManifest => "package.json.mustache".to_string(),
            TemplateId::AppEntry => "App.js.mustache".to_string(),
            TemplateId::RootNavigator => "RootNavigator.js.mustache".to_string(),
            TemplateId::BottomTabs => "BottomTabs.js.mustache".to_string(),
            TemplateId::Drawer => "Drawer.js.mustache".to_string(),
            TemplateId::GlobalButton => "GlobalButton.js.mustache".to_string(),
            TemplateId::GlobalTextInput => "GlobalTextInput.js.mustache".to_string(),
            TemplateId::Screen(template) => format!("{}.mustache", template),
        }
    }

    /// Locations to try, relative to the template root, in order.
    pub fn candidates(&self) -> Vec<String> {
        let navigation = |file: &str| {
            vec![
                format!("{}/src/navigation/{}", TEMPLATES_DIR, file),
                format!("{}/src/navigation/{}", BUILDER_TEMPLATES_DIR, file),
            ]
        };
        match self {
            TemplateId::AppConfig => vec![
                format!("{}/app.config.js.mustache", TEMPLATES_DIR),
                format!("{}/app/app.config.js.mustache", TEMPLATES_DIR),
            ],
            TemplateId::PackageManifest => vec![format!("{}/package.json.mustache", TEMPLATES_DIR)],
            TemplateId::AppEntry => vec![format!("{}/App.js.mustache", TEMPLATES_DIR)],
            TemplateId::RootNavigator => vec![format!(
                "{}/src/navigation/RootNavigator.js.mustache",
                TEMPLATES_DIR
            )],
            TemplateId::BottomTabs => navigation("BottomTabs.js.mustache"),
            TemplateId::Drawer => navigation("Drawer.js.mustache"),
            TemplateId::GlobalButton => vec![format!(
                "{}/src/components/GlobalButton.js.mustache",
                TEMPLATES_DIR
            )],
            TemplateId::GlobalTextInput => vec![format!(
                "{}/src/components/GlobalTextInput.js.mustache",
                TEMPLATES_DIR
            )],
            TemplateId::Screen(template) => {
                vec![format!("{}/src/screens/{}.mustache", TEMPLATES_DIR, template)]
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLANNING
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub template: TemplateId,
    pub output_path: String,
    pub view: Value,
}

fn planned<V: Serialize>(template: TemplateId, output_path: &str, view: &V) -> Result<PlannedFile> {
    let view = serde_json::to_value(view).map_err(|e| GeneratorError::RenderFailure {
        template: template.name(),
        message: format!("view could not be serialized: {}", e),
        view_keys: Vec::new(),
    })?;
    Ok(PlannedFile {
        template,
        output_path: output_path.to_string(),
        view,
    })
}

/// Every file the view produces, in output order.
pub fn plan(view: &LegacyView) -> Result<Vec<PlannedFile>> {
    let nav_view = NavigatorView::from_legacy(view);
    let mut files = vec![
        planned(TemplateId::AppConfig, "app.config.js", &AppConfigView::from_legacy(view))?,
        planned(
            TemplateId::PackageManifest,
            "package.json",
            &PackageManifestView::from_legacy(view),
        )?,
        planned(TemplateId::AppEntry, "App.js", &AppEntryView::from_legacy(view))?,
        planned(
            TemplateId::RootNavigator,
            "src/navigation/RootNavigator.js",
            &nav_view,
        )?,
    ];

    if view.navigation.has_bottom_tabs {
        files.push(planned(
            TemplateId::BottomTabs,
            "src/navigation/BottomTabs.js",
            &nav_view,
        )?);
    }
    if view.navigation.has_drawer {
        files.push(planned(
            TemplateId::Drawer,
            "src/navigation/Drawer.js",
            &nav_view,
        )?);
    }

    files.push(planned(
        TemplateId::GlobalButton,
        "src/components/GlobalButton.js",
        &ComponentView::default(),
    )?);
    files.push(planned(
        TemplateId::GlobalTextInput,
        "src/components/GlobalTextInput.js",
        &ComponentView::default(),
    )?);

    // Each screen sees its own props and nothing else.
    for screen in &view.screens {
        files.push(PlannedFile {
            template: TemplateId::Screen(screen.template.clone()),
            output_path: screen.output_path(),
            view: Value::Object(screen.props.clone()),
        });
    }

    Ok(files)
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENDERING
// ═══════════════════════════════════════════════════════════════════════════════

fn view_keys(view: &Value) -> Vec<String> {
    match view {
        Value::Object(obj) => obj.keys().cloned().collect(),
        other => vec![other.to_string()],
    }
}

fn render_file(file: &PlannedFile, source: &str, tags: &Delimiters) -> Result<String> {
    Template::parse_with(source, tags)
        .map(|template| template.render(&file.view))
        .map_err(|e| GeneratorError::RenderFailure {
            template: file.template.name(),
            message: e.to_string(),
            view_keys: view_keys(&file.view),
        })
}

pub struct Generator<S: TemplateStore> {
    store: S,
    options: GeneratorOptions,
}

impl Generator<FsTemplateStore> {
    /// Generator reading templates from `options.template_root`.
    pub fn from_options(options: GeneratorOptions) -> Self {
        let store = FsTemplateStore::new(options.template_root.clone());
        Generator { store, options }
    }
}

impl<S: TemplateStore> Generator<S> {
    pub fn new(store: S, options: GeneratorOptions) -> Self {
        Generator { store, options }
    }

    /// Validate the request and reduce it to the view the templates consume.
    pub fn prepare(&self, request: &GenerateRequest) -> Result<LegacyView> {
        let view = match request {
            GenerateRequest::Blueprint(blueprint) => {
                let violations = validate_blueprint(blueprint, self.options.validation_options());
                if !violations.is_empty() {
                    return Err(GeneratorError::MalformedBlueprint { violations });
                }
                compile_with(blueprint, self.options.compile_options())
            }
            GenerateRequest::Legacy(view) => view.clone(),
        };

        let violations = validate_outputs(&view);
        if !violations.is_empty() {
            return Err(GeneratorError::MalformedBlueprint { violations });
        }
        Ok(view)
    }

    pub fn generate(&self, request: &GenerateRequest) -> Result<GeneratedArchive> {
        let view = self.prepare(request)?;
        let files = plan(&view)?;
        debug!(kind = request.kind(), files = files.len(), "planned output files");

        let sources = files
            .iter()
            .map(|file| {
                self.store
                    .load(&file.template.name(), &file.template.candidates())
            })
            .collect::<Result<Vec<String>>>()?;

        let tags = &self.options.template_tags;
        let rendered: Vec<Result<String>> = if self.options.parallel_render {
            files
                .par_iter()
                .zip(sources.par_iter())
                .map(|(file, source)| render_file(file, source, tags))
                .collect()
        } else {
            files
                .iter()
                .zip(sources.iter())
                .map(|(file, source)| render_file(file, source, tags))
                .collect()
        };

        let mut archive = ArchiveWriter::new();
        for (file, output) in files.iter().zip(rendered) {
            archive.put(file.output_path.as_str(), output?);
        }

        let bytes = archive.to_bytes()?;
        info!(
            app = %view.slug,
            files = archive.len(),
            bytes = bytes.len(),
            "generated app archive"
        );

        Ok(GeneratedArchive {
            file_name: self.options.archive_file_name.clone(),
            files: archive.paths().map(str::to_string).collect(),
            bytes,
        })
    }

    /// Decode a raw request body and generate.
    pub fn generate_from_slice(&self, body: &[u8]) -> Result<GeneratedArchive> {
        let request = GenerateRequest::from_slice(body)?;
        self.generate(&request)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESPONSE
// ═══════════════════════════════════════════════════════════════════════════════

/// Transport-neutral response: whatever serves HTTP copies these fields out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl GenerateResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn success(archive: GeneratedArchive) -> Self {
        let headers = vec![
            (
                "Content-Type".to_string(),
                GeneratedArchive::CONTENT_TYPE.to_string(),
            ),
            (
                "Content-Disposition".to_string(),
                archive.content_disposition(),
            ),
            ("ETag".to_string(), format!("\"{}\"", archive.digest())),
        ];
        GenerateResponse {
            status: 200,
            headers,
            body: archive.bytes,
        }
    }

    fn failure(error: &GeneratorError) -> Self {
        GenerateResponse {
            status: error.status_code(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: json!({ "error": error.to_string() }).to_string().into_bytes(),
        }
    }
}

/// Handle one generation request body end to end. Never panics; failures
/// come back as a JSON `{"error": ...}` body with a 4xx/5xx status.
pub fn handle_generate<S: TemplateStore>(body: &[u8], generator: &Generator<S>) -> GenerateResponse {
    match generator.generate_from_slice(body) {
        Ok(archive) => GenerateResponse::success(archive),
        Err(error) => {
            warn!(status = error.status_code(), error = %error, "app generation failed");
            GenerateResponse::failure(&error)
        }
    }
}
