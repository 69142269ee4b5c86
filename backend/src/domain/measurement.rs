//! Body measurements and the form templates used to capture them.
//!
//! A measurement is a list of titled sections, each holding named fields with
//! string values and units. Which sections and fields exist is decided by the
//! [`MeasurementTemplate`] for the measurement type; every type currently
//! shares the same template.
//!
//! Clients address template fields with flat identifiers derived from the
//! section title and field name, see [`field_id`].

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{GarmentCategory, MeasurementId, Role, UserId};

/// Garment category a measurement set was taken for.
pub type MeasurementType = GarmentCategory;

/// Kind of person a measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    OrgUser,
    Individual,
}

impl SubjectKind {
    /// Subject kind implied by a caller's own role: individuals measure
    /// themselves, everyone else is treated as an org user.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Individual => Self::Individual,
            Role::SuperAdmin | Role::OrgAdmin | Role::OrgUser => Self::OrgUser,
        }
    }
}

/// A single named measurement value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MeasurementField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub unit: String,
}

/// A titled group of measurement values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MeasurementSection {
    pub title: String,
    pub fields: Vec<MeasurementField>,
}

/// Stored measurement set for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: MeasurementId,
    pub user_id: UserId,
    pub user_type: SubjectKind,
    #[serde(rename = "type")]
    pub measurement_type: MeasurementType,
    pub sections: Vec<MeasurementSection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who a measurement set describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementSubject {
    pub user_id: UserId,
    pub kind: SubjectKind,
}

impl Measurement {
    /// Create a record from validated sections.
    pub fn new(
        id: MeasurementId,
        subject: MeasurementSubject,
        measurement_type: MeasurementType,
        sections: MeasurementSections,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: subject.user_id,
            user_type: subject.kind,
            measurement_type,
            sections: sections.into_inner(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace all sections and stamp `updated_at`.
    pub fn replace_sections(&mut self, sections: MeasurementSections, now: DateTime<Utc>) {
        self.sections = sections.into_inner();
        self.updated_at = now;
    }
}

/// Validation failures for measurement input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeasurementValidationError {
    /// No sections were supplied.
    #[error("measurement must contain at least one section")]
    NoSections,
    /// A section title was blank.
    #[error("section {index} must have a title")]
    EmptySectionTitle {
        /// Zero-based section index.
        index: usize,
    },
    /// A field name was blank.
    #[error("field {field_index} in section '{section}' must have a name")]
    EmptyFieldName {
        /// Title of the containing section.
        section: String,
        /// Zero-based field index within the section.
        field_index: usize,
    },
    /// Two fields normalise to the same identifier.
    #[error("field id '{id}' is used more than once")]
    DuplicateFieldId {
        /// The colliding identifier.
        id: String,
    },
    /// A bound value named a field the template does not define.
    #[error("field id '{id}' is not part of the template")]
    UnknownFieldId {
        /// The unrecognised identifier.
        id: String,
    },
}

fn normalise(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut in_gap = false;
    for ch in part.chars() {
        if ch.is_whitespace() {
            if !in_gap {
                out.push('_');
            }
            in_gap = true;
        } else {
            out.extend(ch.to_lowercase());
            in_gap = false;
        }
    }
    out
}

/// Derive the flat form identifier for a field.
///
/// Each run of whitespace becomes a single `_`, including runs at either
/// end, and the result is lower-cased. Section and field parts are joined
/// with `_`.
///
/// # Examples
/// ```
/// use tailor_backend::domain::field_id;
///
/// assert_eq!(field_id("Upper Body", "Sleeve Length"), "upper_body_sleeve_length");
/// assert_eq!(field_id("Special  Requirements", "Style Notes"), "special_requirements_style_notes");
/// assert_eq!(field_id(" Upper Body", "Chest "), "_upper_body_chest_");
/// ```
pub fn field_id(section_title: &str, field_name: &str) -> String {
    format!("{}_{}", normalise(section_title), normalise(field_name))
}

/// Sections that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementSections(Vec<MeasurementSection>);

impl MeasurementSections {
    /// Validate client-supplied sections.
    ///
    /// Titles and names are trimmed; derived field ids must be unique.
    pub fn try_new(sections: Vec<MeasurementSection>) -> Result<Self, MeasurementValidationError> {
        if sections.is_empty() {
            return Err(MeasurementValidationError::NoSections);
        }
        let mut seen = HashSet::new();
        let mut cleaned = Vec::with_capacity(sections.len());
        for (index, section) in sections.into_iter().enumerate() {
            let title = section.title.trim().to_owned();
            if title.is_empty() {
                return Err(MeasurementValidationError::EmptySectionTitle { index });
            }
            let mut fields = Vec::with_capacity(section.fields.len());
            for (field_index, field) in section.fields.into_iter().enumerate() {
                let name = field.name.trim().to_owned();
                if name.is_empty() {
                    return Err(MeasurementValidationError::EmptyFieldName {
                        section: title,
                        field_index,
                    });
                }
                let id = field_id(&title, &name);
                if !seen.insert(id.clone()) {
                    return Err(MeasurementValidationError::DuplicateFieldId { id });
                }
                fields.push(MeasurementField {
                    name,
                    value: field.value.trim().to_owned(),
                    unit: field.unit.trim().to_owned(),
                });
            }
            cleaned.push(MeasurementSection { title, fields });
        }
        Ok(Self(cleaned))
    }

    /// Borrow the sections.
    pub fn as_slice(&self) -> &[MeasurementSection] {
        &self.0
    }

    fn into_inner(self) -> Vec<MeasurementSection> {
        self.0
    }
}

/// A field slot in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TemplateField {
    /// Flat form identifier, see [`field_id`].
    pub id: String,
    pub name: String,
    pub unit: String,
}

/// A titled group of field slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TemplateSection {
    pub title: String,
    pub fields: Vec<TemplateField>,
}

/// Section/field schema for one measurement type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementTemplate {
    #[serde(rename = "type")]
    pub measurement_type: MeasurementType,
    pub sections: Vec<TemplateSection>,
}

/// Outline of a template section: a title and `(name, unit)` pairs.
pub type SectionOutline<'a> = (&'a str, &'a [(&'a str, &'a str)]);

const INCHES: &str = "inches";

const STANDARD_OUTLINE: [SectionOutline<'static>; 4] = [
    (
        "Upper Body",
        &[
            ("Chest", INCHES),
            ("Shoulder", INCHES),
            ("Sleeve Length", INCHES),
            ("Neck", INCHES),
        ],
    ),
    (
        "Lower Body",
        &[
            ("Waist", INCHES),
            ("Hip", INCHES),
            ("Inseam", INCHES),
            ("Outseam", INCHES),
        ],
    ),
    (
        "Fit Preferences",
        &[
            ("Upper Fit", ""),
            ("Lower Fit", ""),
            ("Sleeve Preference", ""),
            ("Length Preference", ""),
        ],
    ),
    (
        "Special Requirements",
        &[
            ("Fabric Preference", ""),
            ("Color Preference", ""),
            ("Style Notes", ""),
            ("Additional Info", ""),
        ],
    ),
];

fn outline_sections(outline: &[SectionOutline<'_>]) -> Vec<TemplateSection> {
    outline
        .iter()
        .map(|(title, fields)| TemplateSection {
            title: (*title).to_owned(),
            fields: fields
                .iter()
                .map(|(name, unit)| TemplateField {
                    id: field_id(title, name),
                    name: (*name).to_owned(),
                    unit: (*unit).to_owned(),
                })
                .collect(),
        })
        .collect()
}

impl MeasurementTemplate {
    /// Build a template from an outline, rejecting colliding field ids.
    pub fn try_from_outline(
        measurement_type: MeasurementType,
        outline: &[SectionOutline<'_>],
    ) -> Result<Self, MeasurementValidationError> {
        let sections = outline_sections(outline);
        let mut seen = HashSet::new();
        for field in sections.iter().flat_map(|s| s.fields.iter()) {
            if !seen.insert(field.id.as_str()) {
                return Err(MeasurementValidationError::DuplicateFieldId {
                    id: field.id.clone(),
                });
            }
        }
        Ok(Self {
            measurement_type,
            sections,
        })
    }

    /// The built-in template. All types share the same outline.
    pub fn for_type(measurement_type: MeasurementType) -> Self {
        Self {
            measurement_type,
            sections: outline_sections(&STANDARD_OUTLINE),
        }
    }

    /// Every field id in template order.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .map(|f| f.id.as_str())
    }

    /// Fold a flat `{fieldId: value}` map back onto the template.
    ///
    /// Fields without a supplied value are kept with an empty value so the
    /// stored record always mirrors the full template.
    pub fn bind(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<MeasurementSections, MeasurementValidationError> {
        let known: HashSet<&str> = self.field_ids().collect();
        if let Some(unknown) = values.keys().find(|id| !known.contains(id.as_str())) {
            return Err(MeasurementValidationError::UnknownFieldId {
                id: unknown.clone(),
            });
        }
        let sections = self
            .sections
            .iter()
            .map(|section| MeasurementSection {
                title: section.title.clone(),
                fields: section
                    .fields
                    .iter()
                    .map(|slot| MeasurementField {
                        name: slot.name.clone(),
                        value: values.get(&slot.id).cloned().unwrap_or_default(),
                        unit: slot.unit.clone(),
                    })
                    .collect(),
            })
            .collect();
        MeasurementSections::try_new(sections)
    }
}
