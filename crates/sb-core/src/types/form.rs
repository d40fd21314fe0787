//! Form detection types.
//!
//! This module provides types for representing hand-written HTML forms found
//! in source files: the fields they collect, the form library in use, and the
//! complexity policy that gates what the migrator is permitted to touch.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::detection::MatchStrategy;
use super::span::SourceSpan;

/// The form library a detected form is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FormLibrary {
    /// Plain JSX markup with a submit handler.
    #[default]
    Native,

    /// react-hook-form (`useForm` / `register` calls).
    ReactHookForm,

    /// Formik (`<Formik>` / `useFormik`).
    Formik,

    /// A form was recognized but its library could not be determined.
    Unknown,
}

impl FormLibrary {
    /// Returns a human-readable label for this library.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::ReactHookForm => "react-hook-form",
            Self::Formik => "formik",
            Self::Unknown => "unknown",
        }
    }
}

/// How involved a form migration is expected to be.
///
/// Complexity directly determines the [`SuggestedAction`]: this threshold
/// policy gates what the migrator is permitted to touch.
///
/// # Examples
///
/// ```
/// use sb_core::{FormComplexity, SuggestedAction};
///
/// assert_eq!(
///     FormComplexity::Simple.suggested_action(),
///     SuggestedAction::AutoMigrate
/// );
/// assert_eq!(
///     FormComplexity::Complex.suggested_action(),
///     SuggestedAction::Manual
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FormComplexity {
    /// Five or fewer fields, no structural markers.
    Simple,

    /// Six to ten fields.
    Moderate,

    /// More than ten fields, or array-field/multi-step markers present.
    Complex,
}

impl FormComplexity {
    /// Classifies a form from its field count and structural markers.
    ///
    /// # Policy
    ///
    /// - more than 10 fields, or array-field/multi-step markers: `Complex`
    /// - more than 5 fields: `Moderate`
    /// - otherwise: `Simple`
    ///
    /// # Examples
    ///
    /// ```
    /// use sb_core::FormComplexity;
    ///
    /// assert_eq!(FormComplexity::classify(3, false), FormComplexity::Simple);
    /// assert_eq!(FormComplexity::classify(7, false), FormComplexity::Moderate);
    /// assert_eq!(FormComplexity::classify(11, false), FormComplexity::Complex);
    /// assert_eq!(FormComplexity::classify(2, true), FormComplexity::Complex);
    /// ```
    #[must_use]
    pub const fn classify(field_count: usize, has_structural_markers: bool) -> Self {
        if field_count > 10 || has_structural_markers {
            Self::Complex
        } else if field_count > 5 {
            Self::Moderate
        } else {
            Self::Simple
        }
    }

    /// Returns the migration action this complexity permits.
    #[inline]
    #[must_use]
    pub const fn suggested_action(self) -> SuggestedAction {
        match self {
            Self::Simple => SuggestedAction::AutoMigrate,
            Self::Moderate => SuggestedAction::Assisted,
            Self::Complex => SuggestedAction::Manual,
        }
    }

    /// Returns a human-readable label for this complexity.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

/// What the migrator is permitted to do with a detected form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SuggestedAction {
    /// Safe to migrate without supervision.
    AutoMigrate,

    /// Migrate only when assisted mode is enabled.
    Assisted,

    /// Never rewritten automatically.
    Manual,
}

impl SuggestedAction {
    /// Returns a human-readable label for this action.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AutoMigrate => "auto-migrate",
            Self::Assisted => "assisted",
            Self::Manual => "manual",
        }
    }
}

/// One selectable option of a radio group, checkbox group, or select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Display label for the option.
    pub label: String,

    /// Submitted value for the option.
    pub value: String,
}

impl FieldOption {
    /// Creates a new option.
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One input field collected by a form.
///
/// Radio inputs sharing a `name` are coalesced into one field whose
/// [`options`](Self::options) list accumulates label/value pairs in first
/// occurrence order. Checkbox groups coalesce only when more than one sibling
/// shares the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// The `name` attribute of the input.
    pub name: String,

    /// The `type` attribute (`text`, `email`, `radio`, `textarea`, ...).
    pub field_type: String,

    /// Whether the `required` attribute is present.
    pub required: bool,

    /// The `placeholder` attribute, if any.
    pub placeholder: Option<String>,

    /// Options for radio groups, checkbox groups, and selects.
    ///
    /// Empty for scalar fields. Uses `SmallVec` since most option lists
    /// are short.
    pub options: SmallVec<[FieldOption; 4]>,
}

impl FormField {
    /// Creates a scalar field with no options.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            required,
            placeholder: None,
            options: SmallVec::new(),
        }
    }

    /// Returns `true` if this field offers a fixed set of options.
    #[inline]
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// A hand-written form detected in a source file.
///
/// # Examples
///
/// ```
/// use sb_core::{FormComplexity, FormDetection, FormField, FormLibrary, MatchStrategy, SourceSpan};
/// use camino::Utf8PathBuf;
/// use smallvec::smallvec;
///
/// let detection = FormDetection {
///     file_path: Utf8PathBuf::from("app/contact/page.tsx"),
///     span: SourceSpan::new(12, 30),
///     strategy: MatchStrategy::Ast,
///     component_name: "ContactPage".to_owned(),
///     fields: smallvec![FormField::new("email", "email", true)],
///     form_library: FormLibrary::Native,
///     complexity: FormComplexity::Simple,
/// };
///
/// assert_eq!(detection.field_count(), 1);
/// assert_eq!(detection.suggested_action().label(), "auto-migrate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDetection {
    /// Path of the file the form lives in, relative to the scan root.
    pub file_path: Utf8PathBuf,

    /// Line range of the form element.
    pub span: SourceSpan,

    /// Which matching strategy produced this detection.
    pub strategy: MatchStrategy,

    /// Name of the enclosing component.
    pub component_name: String,

    /// Fields the form collects, in source order.
    pub fields: SmallVec<[FormField; 8]>,

    /// The form library in use.
    pub form_library: FormLibrary,

    /// Classified complexity (field count plus structural markers).
    pub complexity: FormComplexity,
}

impl FormDetection {
    /// Returns the number of fields collected by the form.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns the migration action the stored complexity permits.
    #[inline]
    #[must_use]
    pub const fn suggested_action(&self) -> SuggestedAction {
        self.complexity.suggested_action()
    }
}
