//! Raster image usage detection.
//!
//! Feeds the external upload/critical-image pipeline: detections carry the
//! src/alt attributes plus a raster flag, and are never rewritten by the
//! migration engine.

use std::sync::OnceLock;

use regex::Regex;
use sb_core::{Detection, ImageDetection, ImageElement, MatchStrategy, SourceSpan};
use sb_ts_parser::jsx;

use super::{Detector, FileContext, line_of_offset};

/// Raster file extensions.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Text fallback: `<img ... src="...">`.
#[allow(clippy::unwrap_used)] // patterns are compile-time constants
fn img_src_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<img\b[^>]*\bsrc=["']([^"']+)["']"#).unwrap()
    })
}

/// Detects `<img>` and `next/image` usages.
pub struct ImageDetector;

impl Detector for ImageDetector {
    fn name(&self) -> &'static str {
        "images"
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Vec<Detection> {
        match ctx.tree {
            Some(tree) => detect_in_tree(ctx, tree),
            None => detect_in_text(ctx),
        }
    }
}

/// Tree pass over `img` tags and `Image` components.
fn detect_in_tree(ctx: &FileContext<'_>, tree: &tree_sitter::Tree) -> Vec<Detection> {
    let images = jsx::collect_nodes(tree, |node| {
        jsx::ELEMENT_KINDS.contains(&node.kind())
            && matches!(jsx::element_name(node, ctx.source), Some("img" | "Image"))
    });

    images
        .into_iter()
        .filter_map(|node| {
            let element = match jsx::element_name(node, ctx.source) {
                Some("img") => ImageElement::ImgTag,
                Some("Image") => ImageElement::NextImage,
                _ => return None,
            };
            // next/image only counts when actually imported from next/image
            if element == ImageElement::NextImage && !ctx.imports_module("next/image") {
                return None;
            }
            let src = jsx::attribute_value(node, "src", ctx.source)?;

            Some(Detection::Image(ImageDetection {
                file_path: ctx.path.to_owned(),
                span: jsx::span_of(node),
                strategy: MatchStrategy::Ast,
                element,
                is_raster: is_raster_src(&src),
                alt: jsx::attribute_value(node, "alt", ctx.source),
                src,
            }))
        })
        .collect()
}

/// Regex fallback for unparsable files (plain `<img>` tags only).
fn detect_in_text(ctx: &FileContext<'_>) -> Vec<Detection> {
    img_src_regex()
        .captures_iter(ctx.source)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let src = captures.get(1)?.as_str().to_owned();

            Some(Detection::Image(ImageDetection {
                file_path: ctx.path.to_owned(),
                span: SourceSpan::line(line_of_offset(ctx.source, whole.start())),
                strategy: MatchStrategy::Text,
                element: ImageElement::ImgTag,
                is_raster: is_raster_src(&src),
                alt: None,
                src,
            }))
        })
        .collect()
}

/// Returns `true` if the src points at a raster format.
///
/// Query strings and fragments are ignored.
fn is_raster_src(src: &str) -> bool {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    let Some((_, ext)) = path.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    RASTER_EXTENSIONS.contains(&ext.as_str())
}
