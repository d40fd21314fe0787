//! FAQ section detection.
//!
//! Recognizes, in priority order: accordion components, native
//! `<details>`/`<summary>` disclosures, dedicated FAQ components, and
//! static question/answer lists. Tree matching supplies precise spans when
//! a tree is available; regex fallbacks keep the detector working on
//! unparsable files.

use std::sync::OnceLock;

use regex::Regex;
use sb_core::{Detection, FaqDetection, FaqKind, MatchStrategy, SourceSpan};
use sb_ts_parser::jsx;
use tree_sitter::Tree;

use super::{Detector, FileContext, line_of_offset};

/// Matches accordion component usage.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn accordion_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<(\w*Accordion\w*)").unwrap()
    })
}

/// Matches a `<details>` disclosure element.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn details_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<details[\s>]").unwrap()
    })
}

/// Matches a dedicated FAQ component (`<Faq>`, `<FAQSection>`, ...).
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn faq_component_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<((?:FAQ|Faq)\w*)").unwrap()
    })
}

/// Matches a visible question: text ending in `?` before a closing heading
/// or emphasis tag.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn question_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\?\s*</(?:h[2-6]|dt|strong)>").unwrap()
    })
}

/// Minimum question count for the static-list classification.
const STATIC_LIST_MIN_ITEMS: usize = 2;

/// Detects hand-written FAQ sections.
pub struct FaqDetector;

impl Detector for FaqDetector {
    fn name(&self) -> &'static str {
        "faqs"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<Detection> {
        let has_schema = ctx.source.contains("FAQPage");

        let detection = detect_accordion(ctx)
            .or_else(|| detect_details(ctx))
            .or_else(|| detect_component(ctx))
            .or_else(|| detect_static_list(ctx));

        detection
            .map(|mut d| {
                d.has_schema = has_schema;
                Detection::Faq(d)
            })
            .into_iter()
            .collect()
    }
}

/// Accordion components; items counted from `AccordionItem` usages.
fn detect_accordion(ctx: &FileContext<'_>) -> Option<FaqDetection> {
    let captures = accordion_regex().captures(ctx.source)?;
    let whole = captures.get(0)?;
    let component_name = captures.get(1).map(|m| m.as_str().to_owned());

    let item_count = match ctx.source.matches("<AccordionItem").count() {
        0 => accordion_regex().find_iter(ctx.source).count(),
        n => n,
    };

    Some(FaqDetection {
        file_path: ctx.path.to_owned(),
        span: regex_span(ctx, whole.start(), accordion_regex()),
        strategy: MatchStrategy::Text,
        kind: FaqKind::Accordion,
        component_name,
        item_count,
        has_schema: false,
    })
}

/// Native `<details>`/`<summary>` disclosures; tree matching gives the
/// precise span when available.
fn detect_details(ctx: &FileContext<'_>) -> Option<FaqDetection> {
    if let Some(tree) = ctx.tree {
        return detect_details_in_tree(ctx, tree);
    }

    let first = details_regex().find(ctx.source)?;
    let item_count = details_regex().find_iter(ctx.source).count();
    Some(FaqDetection {
        file_path: ctx.path.to_owned(),
        span: regex_span(ctx, first.start(), details_regex()),
        strategy: MatchStrategy::Text,
        kind: FaqKind::DetailsSummary,
        component_name: None,
        item_count,
        has_schema: false,
    })
}

/// Tree pass for `<details>` elements.
fn detect_details_in_tree(ctx: &FileContext<'_>, tree: &Tree) -> Option<FaqDetection> {
    let details = jsx::collect_nodes(tree, |node| {
        node.kind() == "jsx_element" && jsx::element_name(node, ctx.source) == Some("details")
    });

    let first = details.first()?;
    let last = details.last()?;

    Some(FaqDetection {
        file_path: ctx.path.to_owned(),
        span: SourceSpan::new(jsx::span_of(*first).start_line, jsx::span_of(*last).end_line),
        strategy: MatchStrategy::Ast,
        kind: FaqKind::DetailsSummary,
        component_name: None,
        item_count: details.len(),
        has_schema: false,
    })
}

/// Dedicated FAQ components.
fn detect_component(ctx: &FileContext<'_>) -> Option<FaqDetection> {
    let captures = faq_component_regex().captures(ctx.source)?;
    let whole = captures.get(0)?;
    let component_name = captures.get(1).map(|m| m.as_str().to_owned());

    Some(FaqDetection {
        file_path: ctx.path.to_owned(),
        span: SourceSpan::line(line_of_offset(ctx.source, whole.start())),
        strategy: MatchStrategy::Text,
        kind: FaqKind::Component,
        component_name,
        item_count: faq_component_regex().find_iter(ctx.source).count(),
        has_schema: false,
    })
}

/// Static question/answer lists: several headings ending in `?`.
fn detect_static_list(ctx: &FileContext<'_>) -> Option<FaqDetection> {
    let item_count = question_regex().find_iter(ctx.source).count();
    if item_count < STATIC_LIST_MIN_ITEMS {
        return None;
    }

    let first = question_regex().find(ctx.source)?;
    Some(FaqDetection {
        file_path: ctx.path.to_owned(),
        span: regex_span(ctx, first.start(), question_regex()),
        strategy: MatchStrategy::Text,
        kind: FaqKind::StaticList,
        component_name: None,
        item_count,
        has_schema: false,
    })
}

/// Span from the first to the last match of a repeated pattern.
fn regex_span(ctx: &FileContext<'_>, first_start: usize, re: &Regex) -> SourceSpan {
    let last_start = re
        .find_iter(ctx.source)
        .last()
        .map_or(first_start, |m| m.start());
    SourceSpan::new(
        line_of_offset(ctx.source, first_start),
        line_of_offset(ctx.source, last_start),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use sb_ts_parser::SourceParser;

    fn detect(source: &str) -> Vec<FaqDetection> {
        let mut parser = SourceParser::tsx().expect("parser");
        let tree = parser.parse(source).ok();
        let ctx = FileContext {
            path: Utf8Path::new("app/help/page.tsx"),
            source,
            tree: tree.as_ref(),
            imports: &[],
        };
        FaqDetector
            .detect(&ctx)
            .into_iter()
            .map(|d| match d {
                Detection::Faq(f) => f,
                other => panic!("expected faq, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_accordion() {
        let source = r#"
const Help = () => (
  <Accordion>
    <AccordionItem title="How do I pay?">Card.</AccordionItem>
    <AccordionItem title="Can I cancel?">Yes.</AccordionItem>
  </Accordion>
);
"#;
        let faqs = detect(source);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].kind, FaqKind::Accordion);
        assert_eq!(faqs[0].component_name.as_deref(), Some("Accordion"));
        assert_eq!(faqs[0].item_count, 2);
        assert!(!faqs[0].has_schema);
    }

    #[test]
    fn test_details_summary_ast() {
        let source = r"
const Help = () => (
  <section>
    <details><summary>How do I pay?</summary><p>Card.</p></details>
    <details><summary>Can I cancel?</summary><p>Yes.</p></details>
    <details><summary>Is there a trial?</summary><p>Yes.</p></details>
  </section>
);
";
        let faqs = detect(source);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].kind, FaqKind::DetailsSummary);
        assert_eq!(faqs[0].item_count, 3);
        assert_eq!(faqs[0].strategy, MatchStrategy::Ast);
        assert_eq!(faqs[0].span.start_line, 4);
        assert_eq!(faqs[0].span.end_line, 6);
    }

    #[test]
    fn test_faq_component() {
        let source = r#"const Page = () => <FAQSection items={items} />;"#;
        let faqs = detect(source);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].kind, FaqKind::Component);
        assert_eq!(faqs[0].component_name.as_deref(), Some("FAQSection"));
    }

    #[test]
    fn test_static_list() {
        let source = r"
const Page = () => (
  <div>
    <h3>How do I pay?</h3>
    <p>Card.</p>
    <h3>Can I cancel?</h3>
    <p>Yes.</p>
  </div>
);
";
        let faqs = detect(source);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].kind, FaqKind::StaticList);
        assert_eq!(faqs[0].item_count, 2);
    }

    #[test]
    fn test_single_question_not_a_list() {
        let source = r"
const Page = () => (
  <div>
    <h3>How do I pay?</h3>
    <p>Card.</p>
  </div>
);
";
        assert!(detect(source).is_empty());
    }

    #[test]
    fn test_has_schema_flag() {
        let source = r#"
const schema = { "@type": "FAQPage" };
const Help = () => (
  <div>
    <details><summary>Q?</summary>A</details>
  </div>
);
"#;
        let faqs = detect(source);
        assert_eq!(faqs.len(), 1);
        assert!(faqs[0].has_schema);
    }

    #[test]
    fn test_accordion_takes_priority_over_details() {
        let source = r#"
const Help = () => (
  <Accordion>
    <details><summary>Q?</summary>A</details>
  </Accordion>
);
"#;
        let faqs = detect(source);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].kind, FaqKind::Accordion);
    }

    #[test]
    fn test_no_faq() {
        assert!(detect("const x = <div>plain content</div>;").is_empty());
    }
}
