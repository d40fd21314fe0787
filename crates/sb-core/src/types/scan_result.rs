//! Aggregated scan results.
//!
//! This module provides [`ScanResult`], the merged output of all detectors
//! across all scanned files.

use serde::{Deserialize, Serialize};

use super::analytics::AnalyticsDetection;
use super::detection::{Detection, DetectionCategory};
use super::faq::FaqDetection;
use super::form::FormDetection;
use super::image::ImageDetection;
use super::metadata::MetadataDetection;
use super::schema::SchemaDetection;
use super::sitemap::SitemapDetection;
use super::widget::WidgetDetection;

/// The merged output of a scan: one ordered list per concern category.
///
/// Lists are keyed by nothing but insertion order, which is the traversal
/// order of the scan (file order, then source order within a file). There
/// are no implicit cross-references between categories; the only
/// cross-cutting rule is the layout-metadata post-filter applied by the
/// scanner before the result is returned.
///
/// # Examples
///
/// ```
/// use sb_core::ScanResult;
///
/// let result = ScanResult::default();
/// assert!(result.is_empty());
/// assert_eq!(result.total(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Detected forms, in traversal order.
    pub forms: Vec<FormDetection>,
    /// Detected metadata declarations and gaps.
    pub metadata: Vec<MetadataDetection>,
    /// Detected chat widgets.
    pub widgets: Vec<WidgetDetection>,
    /// Detected JSON-LD blocks.
    pub schemas: Vec<SchemaDetection>,
    /// Detected FAQ sections.
    pub faqs: Vec<FaqDetection>,
    /// Detected sitemap artifacts.
    pub sitemaps: Vec<SitemapDetection>,
    /// Detected analytics snippets.
    pub analytics: Vec<AnalyticsDetection>,
    /// Detected image usages.
    pub images: Vec<ImageDetection>,
}

impl ScanResult {
    /// Creates an empty result.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a detection to the list for its category.
    pub fn push(&mut self, detection: Detection) {
        match detection {
            Detection::Form(d) => self.forms.push(d),
            Detection::Metadata(d) => self.metadata.push(d),
            Detection::Widget(d) => self.widgets.push(d),
            Detection::Schema(d) => self.schemas.push(d),
            Detection::Faq(d) => self.faqs.push(d),
            Detection::Sitemap(d) => self.sitemaps.push(d),
            Detection::Analytics(d) => self.analytics.push(d),
            Detection::Image(d) => self.images.push(d),
        }
    }

    /// Appends every detection from `other`, preserving order.
    pub fn merge(&mut self, other: Self) {
        self.forms.extend(other.forms);
        self.metadata.extend(other.metadata);
        self.widgets.extend(other.widgets);
        self.schemas.extend(other.schemas);
        self.faqs.extend(other.faqs);
        self.sitemaps.extend(other.sitemaps);
        self.analytics.extend(other.analytics);
        self.images.extend(other.images);
    }

    /// Returns the number of detections in one category.
    #[must_use]
    pub fn count(&self, category: DetectionCategory) -> usize {
        match category {
            DetectionCategory::Forms => self.forms.len(),
            DetectionCategory::Metadata => self.metadata.len(),
            DetectionCategory::Widgets => self.widgets.len(),
            DetectionCategory::Schemas => self.schemas.len(),
            DetectionCategory::Faqs => self.faqs.len(),
            DetectionCategory::Sitemaps => self.sitemaps.len(),
            DetectionCategory::Analytics => self.analytics.len(),
            DetectionCategory::Images => self.images.len(),
        }
    }

    /// Returns the total number of detections across all categories.
    #[must_use]
    pub fn total(&self) -> usize {
        DetectionCategory::ALL
            .iter()
            .map(|&c| self.count(c))
            .sum()
    }

    /// Returns `true` if no detections were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
