//! Template Engine
//!
//! Mustache-compatible renderer. Tags start out as `{{ }}`, or whatever
//! delimiters the caller configures, and a template may switch them at any
//! point with a set-delimiter tag such as `{{=<% %>=}}`. Templates full of JSX
//! `{{ }}` switch to `<% %>` on their first line. Supported tags:
//!
//! - `{{ name }}` escaped interpolation
//! - `{{& name }}` and `{{{ name }}}` raw interpolation
//! - `{{# name }}` / `{{^ name }}` sections and inverted sections, closed by `{{/ name }}`
//! - `{{! comment }}`
//! - `{{=<% %>=}}` set delimiters
//!
//! Names may be dotted (`user.name`) or `.` for the current context. Section,
//! comment and set-delimiter tags standing alone on a line remove the whole line.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

lazy_static! {
    /// Body of a set-delimiter tag: two whitespace-separated tags, no `=`.
    static ref SET_DELIMITERS_RE: Regex = Regex::new(r"^([^\s=]+)\s+([^\s=]+)$").unwrap();
}

/// Opening and closing tag delimiters. On the wire a two-element array,
/// `["{{", "}}"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters(pub String, pub String);

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters::new("{{", "}}")
    }
}

impl Delimiters {
    pub fn new(open: &str, close: &str) -> Self {
        Delimiters(open.to_string(), close.to_string())
    }

    pub fn open(&self) -> &str {
        &self.0
    }

    pub fn close(&self) -> &str {
        &self.1
    }

    fn check(&self) -> Result<(), String> {
        let valid = |tag: &str| !tag.is_empty() && !tag.contains(|c: char| c.is_whitespace() || c == '=');
        if valid(self.open()) && valid(self.close()) {
            Ok(())
        } else {
            Err(format!(
                "invalid delimiters \"{} {}\": tags must be non-empty, without whitespace or `=`",
                self.open(),
                self.close()
            ))
        }
    }

    fn from_set_tag(body: &str) -> Option<Delimiters> {
        let caps = SET_DELIMITERS_RE.captures(body)?;
        Some(Delimiters::new(caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateError {
    pub message: String,
    /// Byte offset in the template source.
    pub position: usize,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.position)
    }
}

impl std::error::Error for TemplateError {}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Variable { name: String, escape: bool },
    Section {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Escaped,
    Raw,
    Open,
    Inverted,
    Close,
    Comment,
    SetDelimiters,
}

impl TagKind {
    fn can_stand_alone(self) -> bool {
        !matches!(self, TagKind::Escaped | TagKind::Raw)
    }
}

struct ScannedTag {
    kind: TagKind,
    /// Variable or section name, comment text, or set-delimiter body.
    name: String,
    end: usize,
}

/// Read the tag whose opening delimiter starts at `start`.
fn scan_tag(source: &str, start: usize, tags: &Delimiters) -> Result<ScannedTag, TemplateError> {
    let body_start = start + tags.open().len();
    let rest = &source[body_start..];
    let trimmed = rest.trim_start();
    let sigil = trimmed.chars().next().filter(|c| "#^/!&{=".contains(*c));

    let (kind, terminator) = match sigil {
        Some('{') => (TagKind::Raw, format!("}}{}", tags.close())),
        Some('=') => (TagKind::SetDelimiters, format!("={}", tags.close())),
        Some('&') => (TagKind::Raw, tags.close().to_string()),
        Some('#') => (TagKind::Open, tags.close().to_string()),
        Some('^') => (TagKind::Inverted, tags.close().to_string()),
        Some('/') => (TagKind::Close, tags.close().to_string()),
        Some('!') => (TagKind::Comment, tags.close().to_string()),
        _ => (TagKind::Escaped, tags.close().to_string()),
    };

    let content_start = body_start + (rest.len() - trimmed.len()) + sigil.map_or(0, char::len_utf8);
    let Some(found) = source[content_start..].find(&terminator) else {
        let message = if sigil == Some('{') && source[content_start..].contains(tags.close()) {
            format!("unclosed raw tag, expected `{}`", terminator)
        } else {
            "unclosed tag".to_string()
        };
        return Err(TemplateError { message, position: start });
    };

    let name = source[content_start..content_start + found].trim().to_string();
    if kind != TagKind::Comment && name.is_empty() {
        return Err(TemplateError {
            message: "empty tag".to_string(),
            position: start,
        });
    }

    Ok(ScannedTag {
        kind,
        name,
        end: content_start + found + terminator.len(),
    })
}

/// A parsed template, reusable across renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

struct OpenSection {
    name: String,
    inverted: bool,
    position: usize,
    parent: Vec<Node>,
}

impl Template {
    /// Parse with the default `{{ }}` delimiters.
    pub fn parse(source: &str) -> Result<Template, TemplateError> {
        Self::parse_with(source, &Delimiters::default())
    }

    /// Parse starting from `delimiters`.
    pub fn parse_with(source: &str, delimiters: &Delimiters) -> Result<Template, TemplateError> {
        delimiters
            .check()
            .map_err(|message| TemplateError { message, position: 0 })?;

        let mut tags = delimiters.clone();
        let mut nodes: Vec<Node> = Vec::new();
        let mut open: Vec<OpenSection> = Vec::new();
        let mut cursor = 0;

        while let Some(offset) = source[cursor..].find(tags.open()) {
            let start = cursor + offset;
            let ScannedTag { kind, name, end } = scan_tag(source, start, &tags)?;

            let mut text_end = start;
            let mut next_cursor = end;
            if kind.can_stand_alone() {
                let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
                let line_end = source[end..]
                    .find('\n')
                    .map_or(source.len(), |i| end + i + 1);
                let alone = line_start >= cursor
                    && source[line_start..start].trim().is_empty()
                    && source[end..line_end].trim().is_empty();
                if alone {
                    text_end = line_start;
                    next_cursor = line_end;
                }
            }

            if text_end > cursor {
                nodes.push(Node::Text(source[cursor..text_end].to_string()));
            }
            cursor = next_cursor;

            match kind {
                TagKind::Escaped => nodes.push(Node::Variable { name, escape: true }),
                TagKind::Raw => nodes.push(Node::Variable { name, escape: false }),
                TagKind::Comment => {}
                TagKind::SetDelimiters => {
                    tags = Delimiters::from_set_tag(&name).ok_or_else(|| TemplateError {
                        message: format!("invalid set delimiters tag \"{}\"", name),
                        position: start,
                    })?;
                }
                TagKind::Open | TagKind::Inverted => {
                    open.push(OpenSection {
                        name,
                        inverted: kind == TagKind::Inverted,
                        position: start,
                        parent: std::mem::take(&mut nodes),
                    });
                }
                TagKind::Close => {
                    let Some(section) = open.pop() else {
                        return Err(TemplateError {
                            message: format!("unopened section \"{}\"", name),
                            position: start,
                        });
                    };
                    if section.name != name {
                        return Err(TemplateError {
                            message: format!(
                                "unclosed section \"{}\", found close of \"{}\"",
                                section.name, name
                            ),
                            position: start,
                        });
                    }
                    let children = std::mem::replace(&mut nodes, section.parent);
                    nodes.push(Node::Section {
                        name: section.name,
                        inverted: section.inverted,
                        children,
                    });
                }
            }
        }

        if let Some(section) = open.pop() {
            return Err(TemplateError {
                message: format!("unclosed section \"{}\"", section.name),
                position: section.position,
            });
        }

        if cursor < source.len() {
            nodes.push(Node::Text(source[cursor..].to_string()));
        }

        Ok(Template { nodes })
    }

    pub fn render(&self, view: &Value) -> String {
        let mut out = String::new();
        let mut stack = vec![view];
        render_nodes(&self.nodes, &mut stack, &mut out);
        out
    }
}

/// Parse and render in one step, with the default `{{ }}` delimiters.
pub fn render(source: &str, view: &Value) -> Result<String, TemplateError> {
    Ok(Template::parse(source)?.render(view))
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENDERING
// ═══════════════════════════════════════════════════════════════════════════════

fn render_nodes<'v>(nodes: &[Node], stack: &mut Vec<&'v Value>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable { name, escape } => {
                if let Some(value) = lookup(stack, name) {
                    let text = stringify(value);
                    if *escape {
                        escape_html_into(&text, out);
                    } else {
                        out.push_str(&text);
                    }
                }
            }
            Node::Section {
                name,
                inverted,
                children,
            } => {
                let value = lookup(stack, name);
                if *inverted {
                    if !value.is_some_and(is_truthy) {
                        render_nodes(children, stack, out);
                    }
                    continue;
                }
                match value {
                    Some(Value::Array(items)) => {
                        for item in items {
                            stack.push(item);
                            render_nodes(children, stack, out);
                            stack.pop();
                        }
                    }
                    Some(value) if is_truthy(value) => {
                        stack.push(value);
                        render_nodes(children, stack, out);
                        stack.pop();
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Resolve `name` against the context stack, innermost first. A dotted name
/// must resolve completely within one context; otherwise the search moves on
/// to the enclosing one.
fn lookup<'v>(stack: &[&'v Value], name: &str) -> Option<&'v Value> {
    if name == "." {
        return stack.last().copied();
    }
    stack.iter().rev().find_map(|ctx| resolve_path(ctx, name))
}

fn resolve_path<'v>(ctx: &'v Value, name: &str) -> Option<&'v Value> {
    name.split('.').try_fold(ctx, |value, segment| match value {
        Value::Object(obj) => obj.get(segment),
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
        _ => None,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Object(_) => true,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_f64() {
                match n.as_f64() {
                    // Integral floats print without a fractional part, as JS does.
                    Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            } else {
                n.to_string()
            }
        }
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn escape_html_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn percent() -> Delimiters {
        Delimiters::new("<%", "%>")
    }

    #[test]
    fn test_interpolation_and_escaping() {
        let out = render("Hello {{ name }}!", &json!({ "name": "Tom & <Jerry>" })).unwrap();
        assert_eq!(out, "Hello Tom &amp; &lt;Jerry&gt;!");

        let raw = render("{{& html }}|{{{ html }}}", &json!({ "html": "<b>" })).unwrap();
        assert_eq!(raw, "<b>|<b>");
    }

    #[test]
    fn test_default_delimiters_are_mustache() {
        let out = render("name: {{appName}}", &json!({ "appName": "Shop" })).unwrap();
        assert_eq!(out, "name: Shop");
    }

    #[test]
    fn test_configured_starting_delimiters() {
        let tpl = Template::parse_with("<% a %>{{a}}<%{ b }%>", &percent()).unwrap();
        assert_eq!(tpl.render(&json!({ "a": 1, "b": "<i>" })), "1{{a}}<i>");
    }

    #[test]
    fn test_set_delimiters_mid_template() {
        let tpl = "{{a}} {{=<% %>=}}<% a %> {{a}} <%={{ }}=%>{{a}}";
        assert_eq!(render(tpl, &json!({ "a": 1 })).unwrap(), "1 1 {{a}} 1");
    }

    #[test]
    fn test_set_delimiters_only() {
        assert_eq!(render("{{=<% %>=}}x", &json!({})).unwrap(), "x");

        let same = Template::parse_with("<%=<% %>=%>x", &percent()).unwrap();
        assert_eq!(same.render(&json!({})), "x");
    }

    #[test]
    fn test_jsx_braces_pass_through_after_switch() {
        let tpl = "{{=<% %>=}}\n<View style={{ flex: 1 }}><Text><% title %></Text></View>";
        let out = render(tpl, &json!({ "title": "Home" })).unwrap();
        assert_eq!(out, "<View style={{ flex: 1 }}><Text>Home</Text></View>");
    }

    #[test]
    fn test_invalid_delimiters() {
        let err = Template::parse("{{=<%=}}").unwrap_err();
        assert!(err.message.contains("invalid set delimiters"));
        assert_eq!(err.position, 0);

        assert!(Template::parse("{{= a b c =}}").is_err());
        assert!(Template::parse_with("x", &Delimiters::new("", "}}")).is_err());
        assert!(Template::parse_with("x", &Delimiters::new("<% ", "%>")).is_err());
    }

    #[test]
    fn test_missing_values_render_empty() {
        assert_eq!(render("[{{ nope }}]", &json!({})).unwrap(), "[]");
        assert_eq!(render("[{{ a.b.c }}]", &json!({ "a": { "b": 1 } })).unwrap(), "[]");
    }

    #[test]
    fn test_numbers_and_booleans() {
        let view = json!({ "i": 3, "f": 2.0, "g": 1.5, "t": true });
        assert_eq!(render("{{i}} {{f}} {{g}} {{t}}", &view).unwrap(), "3 2 1.5 true");
    }

    #[test]
    fn test_list_section_and_dot() {
        let view = json!({ "tabs": [{ "name": "Home" }, { "name": "Settings" }], "tags": ["a", "b"] });
        let out = render("{{#tabs}}[{{name}}]{{/tabs}} {{#tags}}{{.}};{{/tags}}", &view).unwrap();
        assert_eq!(out, "[Home][Settings] a;b;");
    }

    #[test]
    fn test_sections_fall_back_to_outer_context() {
        let view = json!({ "appName": "Shop", "stack": [{ "name": "Home" }] });
        let out = render("{{#stack}}{{appName}}/{{name}}{{/stack}}", &view).unwrap();
        assert_eq!(out, "Shop/Home");
    }

    #[test]
    fn test_dotted_names_fall_back_to_outer_context() {
        let view = json!({ "a": { "b": "outer" }, "items": [{ "a": {} }, { "a": { "b": "inner" } }] });
        let out = render("{{#items}}[{{ a.b }}]{{/items}}", &view).unwrap();
        assert_eq!(out, "[outer][inner]");
    }

    #[test]
    fn test_inverted_and_falsy() {
        let tpl = "{{^items}}none{{/items}}{{#flag}}on{{/flag}}";
        assert_eq!(render(tpl, &json!({ "items": [], "flag": false })).unwrap(), "none");
        assert_eq!(render(tpl, &json!({ "items": [1], "flag": true })).unwrap(), "on");
        assert_eq!(render(tpl, &json!({})).unwrap(), "none");
    }

    #[test]
    fn test_object_section_pushes_context() {
        let view = json!({ "features": { "auth": { "google": true } } });
        let tpl = "{{#features.auth}}{{#google}}G{{/google}}{{/features.auth}}";
        assert_eq!(render(tpl, &view).unwrap(), "G");
    }

    #[test]
    fn test_standalone_lines_are_removed() {
        let tpl = "{{=<% %>=}}\nimport React from 'react';\n<%#hasBottomTabs%>\nimport BottomTabs from './BottomTabs';\n<%/hasBottomTabs%>\n<%! dropped %>\nexport default 1;\n";
        let on = render(tpl, &json!({ "hasBottomTabs": true })).unwrap();
        assert_eq!(
            on,
            "import React from 'react';\nimport BottomTabs from './BottomTabs';\nexport default 1;\n"
        );
        let off = render(tpl, &json!({ "hasBottomTabs": false })).unwrap();
        assert_eq!(off, "import React from 'react';\nexport default 1;\n");
    }

    #[test]
    fn test_inline_section_keeps_whitespace() {
        let out = render("a {{#x}}b{{/x}} c", &json!({ "x": true })).unwrap();
        assert_eq!(out, "a b c");
    }

    #[test]
    fn test_parse_errors() {
        let unclosed = Template::parse("{{#a}}text").unwrap_err();
        assert!(unclosed.message.contains("unclosed section \"a\""));
        assert_eq!(unclosed.position, 0);

        let mismatched = Template::parse("{{#a}}{{/b}}").unwrap_err();
        assert!(mismatched.message.contains("found close of \"b\""));

        let stray = Template::parse("x {{/a}}").unwrap_err();
        assert!(stray.message.contains("unopened section"));

        let open_tag = Template::parse_with("hello <% name", &percent()).unwrap_err();
        assert_eq!(open_tag.message, "unclosed tag");
        assert_eq!(open_tag.position, 6);

        let raw = Template::parse_with("<%{ name %>", &percent()).unwrap_err();
        assert!(raw.message.contains("unclosed raw tag"));
        assert!(Template::parse("{{  }}").is_err());
    }

    #[test]
    fn test_template_reuse() {
        let tpl = Template::parse("{{n}}").unwrap();
        assert_eq!(tpl.render(&json!({ "n": 1 })), "1");
        assert_eq!(tpl.render(&json!({ "n": 2 })), "2");
    }
}
