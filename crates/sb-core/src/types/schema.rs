//! Structured-data (JSON-LD) detection types.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::detection::MatchStrategy;
use super::span::SourceSpan;

/// Coarse classification bucket for a JSON-LD `@type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SchemaCategory {
    /// `Product`, `Offer`, and friends.
    Product,
    /// `Article`, `BlogPosting`, `NewsArticle`.
    Article,
    /// `FAQPage`.
    Faq,
    /// `LocalBusiness` and its subtypes.
    LocalBusiness,
    /// `Organization`.
    Organization,
    /// `Event`.
    Event,
    /// `Recipe`.
    Recipe,
    /// `Review`, `AggregateRating`.
    Review,
    /// `BreadcrumbList`.
    Breadcrumb,
    /// Anything else (including unparsable payloads).
    Other,
}

impl SchemaCategory {
    /// Buckets a raw `@type` value into a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use sb_core::SchemaCategory;
    ///
    /// assert_eq!(SchemaCategory::from_type("FAQPage"), SchemaCategory::Faq);
    /// assert_eq!(SchemaCategory::from_type("BlogPosting"), SchemaCategory::Article);
    /// assert_eq!(SchemaCategory::from_type("Spaceship"), SchemaCategory::Other);
    /// ```
    #[must_use]
    pub fn from_type(schema_type: &str) -> Self {
        match schema_type {
            "Product" | "Offer" | "AggregateOffer" => Self::Product,
            "Article" | "BlogPosting" | "NewsArticle" => Self::Article,
            "FAQPage" => Self::Faq,
            "Organization" => Self::Organization,
            "Event" => Self::Event,
            "Recipe" => Self::Recipe,
            "Review" | "AggregateRating" => Self::Review,
            "BreadcrumbList" => Self::Breadcrumb,
            t if t.contains("LocalBusiness") || t.ends_with("Store") || t.ends_with("Restaurant") =>
            {
                Self::LocalBusiness
            }
            _ => Self::Other,
        }
    }

    /// Returns a human-readable label for this category.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Article => "article",
            Self::Faq => "faq",
            Self::LocalBusiness => "local-business",
            Self::Organization => "organization",
            Self::Event => "event",
            Self::Recipe => "recipe",
            Self::Review => "review",
            Self::Breadcrumb => "breadcrumb",
            Self::Other => "other",
        }
    }
}

/// An inline JSON-LD block detected in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDetection {
    /// Path of the file, relative to the scan root.
    pub file_path: Utf8PathBuf,

    /// Line range of the `script` element (unknown for text-only matches).
    pub span: SourceSpan,

    /// Which matching strategy produced this detection.
    pub strategy: MatchStrategy,

    /// The raw `@type` value (e.g. `"Product"`), when extractable.
    pub schema_type: String,

    /// Coarse classification of the `@type` value.
    pub category: SchemaCategory,

    /// The raw JSON payload, when it parsed cleanly.
    pub raw_json: Option<String>,
}

impl SchemaDetection {
    /// Returns `true` if the JSON payload was recovered intact.
    #[inline]
    #[must_use]
    pub const fn has_payload(&self) -> bool {
        self.raw_json.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_buckets() {
        assert_eq!(SchemaCategory::from_type("Product"), SchemaCategory::Product);
        assert_eq!(SchemaCategory::from_type("Article"), SchemaCategory::Article);
        assert_eq!(
            SchemaCategory::from_type("NewsArticle"),
            SchemaCategory::Article
        );
        assert_eq!(SchemaCategory::from_type("FAQPage"), SchemaCategory::Faq);
        assert_eq!(
            SchemaCategory::from_type("LocalBusiness"),
            SchemaCategory::LocalBusiness
        );
        assert_eq!(
            SchemaCategory::from_type("HardwareStore"),
            SchemaCategory::LocalBusiness
        );
        assert_eq!(
            SchemaCategory::from_type("BreadcrumbList"),
            SchemaCategory::Breadcrumb
        );
        assert_eq!(SchemaCategory::from_type(""), SchemaCategory::Other);
    }

    #[test]
    fn test_detection_serialization() {
        let d = SchemaDetection {
            file_path: Utf8PathBuf::from("app/products/page.tsx"),
            span: SourceSpan::new(5, 20),
            strategy: MatchStrategy::Ast,
            schema_type: "Product".to_owned(),
            category: SchemaCategory::Product,
            raw_json: Some(r#"{"@type":"Product"}"#.to_owned()),
        };
        assert!(d.has_payload());
        let json = serde_json::to_string(&d).unwrap();
        let parsed: SchemaDetection = serde_json::from_str(&json).unwrap();
        assert_eq!(d, parsed);
    }
}
