//! Form detection.
//!
//! The primary pass walks markup nodes for `<form>` elements carrying a
//! submit handler and extracts every descendant `input`/`textarea`/`select`
//! into typed fields. A parallel, independent pass recognizes third-party
//! form libraries by import name and call-signature heuristics when the
//! markup-based match yields nothing.

use std::sync::OnceLock;

use camino::Utf8Path;
use regex::Regex;
use rustc_hash::FxHashMap;
use sb_core::{
    Detection, FieldOption, FormComplexity, FormDetection, FormField, FormLibrary, MatchStrategy,
    SourceSpan,
};
use sb_ts_parser::jsx;
use smallvec::SmallVec;
use tree_sitter::Node;

use super::{Detector, FileContext, line_of_offset};

/// Text markers indicating array fields or multi-step flows.
///
/// Any hit forces the complex classification: those forms need human
/// judgment no matter how few fields the markup shows.
const STRUCTURAL_MARKERS: &[&str] = &[
    "useFieldArray",
    "<FieldArray",
    "currentStep",
    "activeStep",
    "nextStep(",
];

/// Matches react-hook-form `register('fieldName')` calls.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn register_call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"register\(\s*['"]([\w.\-\[\]]+)['"]"#).unwrap()
    })
}

/// Matches formik `<Field name="..." />` usages.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn formik_field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<Field[^>]*\bname=["']([\w.\-\[\]]+)["']"#).unwrap()
    })
}

/// Detects hand-written forms in markup, with a library-heuristic fallback.
pub struct FormDetector;

impl Detector for FormDetector {
    fn name(&self) -> &'static str {
        "forms"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<Detection> {
        let library = classify_library(ctx);
        let has_markers = has_structural_markers(ctx.source);

        let mut detections = Vec::new();

        if let Some(tree) = ctx.tree {
            for form in form_elements(tree, ctx.source) {
                let fields = extract_fields(form, ctx.source);
                let complexity = FormComplexity::classify(fields.len(), has_markers);
                detections.push(Detection::Form(FormDetection {
                    file_path: ctx.path.to_owned(),
                    span: jsx::span_of(form),
                    strategy: MatchStrategy::Ast,
                    component_name: component_name_for(form, ctx.source, ctx.path),
                    fields,
                    form_library: library,
                    complexity,
                }));
            }
        }

        // Library pass only when the markup pass found nothing
        if detections.is_empty() {
            if let Some(detection) = library_fallback(ctx, library, has_markers) {
                detections.push(detection);
            }
        }

        detections
    }
}

/// Collects `jsx_element` nodes that are `<form>` with a submit handler.
fn form_elements<'t>(tree: &'t tree_sitter::Tree, source: &str) -> Vec<Node<'t>> {
    jsx::collect_nodes(tree, |node| {
        if node.kind() != "jsx_element" {
            return false;
        }
        let Some(name) = jsx::element_name(node, source) else {
            return false;
        };
        if name != "form" {
            return false;
        }
        jsx::has_attribute(node, "onSubmit", source)
            || jsx::has_attribute(node, "onsubmit", source)
            || jsx::has_attribute(node, "action", source)
    })
}

/// Extracts the fields collected by one form element, coalescing radio and
/// checkbox groups.
fn extract_fields(form: Node<'_>, source: &str) -> SmallVec<[FormField; 8]> {
    let mut fields: SmallVec<[FormField; 8]> = SmallVec::new();
    // (name, type) -> index into fields, for group coalescing
    let mut group_index: FxHashMap<(String, String), usize> = FxHashMap::default();
    // First-seen value of a checkbox, promoted to an option if a sibling appears
    let mut checkbox_first_value: FxHashMap<String, Option<String>> = FxHashMap::default();

    jsx::visit(form, &mut |node| {
        if !jsx::ELEMENT_KINDS.contains(&node.kind()) {
            return;
        }
        let Some(tag) = jsx::element_name(node, source) else {
            return;
        };
        match tag {
            "input" => {
                let Some(name) = jsx::attribute_value(node, "name", source) else {
                    return;
                };
                let field_type = jsx::attribute_value(node, "type", source)
                    .unwrap_or_else(|| "text".to_owned());
                let required = jsx::has_attribute(node, "required", source);
                let value = jsx::attribute_value(node, "value", source);

                match field_type.as_str() {
                    "radio" => coalesce_radio(
                        &mut fields,
                        &mut group_index,
                        &name,
                        required,
                        value.as_deref(),
                    ),
                    "checkbox" => coalesce_checkbox(
                        &mut fields,
                        &mut group_index,
                        &mut checkbox_first_value,
                        &name,
                        required,
                        value,
                    ),
                    _ => {
                        let mut field = FormField::new(name, field_type, required);
                        field.placeholder = jsx::attribute_value(node, "placeholder", source);
                        fields.push(field);
                    }
                }
            }
            "textarea" => {
                let Some(name) = jsx::attribute_value(node, "name", source) else {
                    return;
                };
                let mut field = FormField::new(
                    name,
                    "textarea",
                    jsx::has_attribute(node, "required", source),
                );
                field.placeholder = jsx::attribute_value(node, "placeholder", source);
                fields.push(field);
            }
            "select" => {
                let Some(name) = jsx::attribute_value(node, "name", source) else {
                    return;
                };
                let mut field = FormField::new(
                    name,
                    "select",
                    jsx::has_attribute(node, "required", source),
                );
                field.options = select_options(node, source);
                fields.push(field);
            }
            _ => {}
        }
    });

    fields
}

/// Radio inputs sharing a `name` merge into one field whose options list
/// accumulates label/value pairs in first occurrence order.
fn coalesce_radio(
    fields: &mut SmallVec<[FormField; 8]>,
    group_index: &mut FxHashMap<(String, String), usize>,
    name: &str,
    required: bool,
    value: Option<&str>,
) {
    let key = (name.to_owned(), "radio".to_owned());
    let idx = *group_index.entry(key).or_insert_with(|| {
        fields.push(FormField::new(name, "radio", false));
        fields.len() - 1
    });
    let field = &mut fields[idx];
    field.required |= required;
    if let Some(v) = value {
        field.options.push(FieldOption::new(v, v));
    }
}

/// Checkbox groups merge only when more than one sibling shares the name;
/// a lone checkbox stays a single boolean field without options.
fn coalesce_checkbox(
    fields: &mut SmallVec<[FormField; 8]>,
    group_index: &mut FxHashMap<(String, String), usize>,
    first_value: &mut FxHashMap<String, Option<String>>,
    name: &str,
    required: bool,
    value: Option<String>,
) {
    let key = (name.to_owned(), "checkbox".to_owned());
    if let Some(&idx) = group_index.get(&key) {
        // Second (or later) sibling: promote to an option group
        let field = &mut fields[idx];
        field.required |= required;
        if field.options.is_empty() {
            if let Some(Some(first)) = first_value.get(name) {
                let first = first.clone();
                field.options.push(FieldOption::new(first.clone(), first));
            }
        }
        if let Some(v) = value {
            field.options.push(FieldOption::new(v.clone(), v));
        }
    } else {
        group_index.insert(key, fields.len());
        first_value.insert(name.to_owned(), value);
        fields.push(FormField::new(name, "checkbox", required));
    }
}

/// Reads `<option>` children of a `<select>` into field options.
///
/// The label is the option's visible text, falling back to its value.
fn select_options(select: Node<'_>, source: &str) -> SmallVec<[FieldOption; 4]> {
    let mut options = SmallVec::new();
    jsx::visit(select, &mut |node| {
        if node.kind() != "jsx_element" {
            return;
        }
        if jsx::element_name(node, source) != Some("option") {
            return;
        }
        let value = jsx::attribute_value(node, "value", source);
        let text = jsx::element_text(node, source);
        let value = value.unwrap_or_else(|| text.clone());
        let label = if text.is_empty() { value.clone() } else { text };
        options.push(FieldOption::new(label, value));
    });
    options
}

/// Classifies the form library from the file's imports.
fn classify_library(ctx: &FileContext<'_>) -> FormLibrary {
    if ctx.imports_module("react-hook-form") {
        FormLibrary::ReactHookForm
    } else if ctx.imports_module("formik") {
        FormLibrary::Formik
    } else if ctx.tree.is_some() {
        FormLibrary::Native
    } else {
        FormLibrary::Unknown
    }
}

/// Returns `true` if array-field/multi-step markers appear in the file.
fn has_structural_markers(source: &str) -> bool {
    STRUCTURAL_MARKERS.iter().any(|m| source.contains(m))
}

/// Library-heuristic fallback when the markup pass found no `<form>`.
///
/// react-hook-form forms are reconstructed from `register('...')` calls,
/// formik forms from `<Field name="..." />` usages. Field order is first
/// occurrence order, duplicates removed.
fn library_fallback(
    ctx: &FileContext<'_>,
    library: FormLibrary,
    has_markers: bool,
) -> Option<Detection> {
    let (regex, library) = match library {
        FormLibrary::ReactHookForm => (register_call_regex(), FormLibrary::ReactHookForm),
        FormLibrary::Formik => (formik_field_regex(), FormLibrary::Formik),
        _ => return None,
    };

    let mut fields: SmallVec<[FormField; 8]> = SmallVec::new();
    let mut seen: FxHashMap<String, ()> = FxHashMap::default();
    let mut first_line = 0u32;
    let mut last_line = 0u32;

    for captures in regex.captures_iter(ctx.source) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if seen.insert(name.as_str().to_owned(), ()).is_some() {
            continue;
        }
        let line = line_of_offset(ctx.source, whole.start());
        if first_line == 0 {
            first_line = line;
        }
        last_line = line;
        fields.push(FormField::new(name.as_str(), "text", false));
    }

    if fields.is_empty() {
        return None;
    }

    let complexity = FormComplexity::classify(fields.len(), has_markers);
    Some(Detection::Form(FormDetection {
        file_path: ctx.path.to_owned(),
        span: SourceSpan::new(first_line, last_line),
        strategy: MatchStrategy::Text,
        component_name: derive_component_name(ctx.path),
        fields,
        form_library: library,
        complexity,
    }))
}

/// Names the component containing a form node, or derives one from the
/// file path.
fn component_name_for(node: Node<'_>, source: &str, path: &Utf8Path) -> String {
    jsx::enclosing_component_name(node, source).unwrap_or_else(|| derive_component_name(path))
}

/// Derives a PascalCase component name from a file path.
///
/// Framework filenames (`page`, `layout`, `index`) borrow the parent
/// directory name instead.
fn derive_component_name(path: &Utf8Path) -> String {
    let stem = path.file_stem().unwrap_or("Form");
    let base = if matches!(stem, "page" | "layout" | "index") {
        path.parent()
            .and_then(|p| p.file_name())
            .unwrap_or(stem)
    } else {
        stem
    };
    pascal_case(base)
}

/// Converts `kebab-case`/`snake_case` to `PascalCase`.
fn pascal_case(input: &str) -> String {
    input
        .split(|c: char| c == '-' || c == '_' || c == ' ')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
