//! Immutable, session-wide view of the loaded report documents.
use serde::de::DeserializeOwned;

use crate::config::ReportConfig;
use crate::data::{Analysis, AnalysisTable, SeriesEntry, Skill, ValuesTable};
use crate::load::{DocumentKind, LoadError, RawDocuments};
use crate::resolve::{Resolution, Resolver};

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    skills: Vec<Skill>,
    series: Vec<SeriesEntry>,
    values: ValuesTable,
    analysis: AnalysisTable,
    resolution: Resolution,
    jump_threshold: f64,
}

fn parse<T: DeserializeOwned>(kind: DocumentKind, text: &str) -> Result<T, LoadError> {
    serde_json::from_str(text).map_err(|source| LoadError::Parse {
        document: kind,
        source,
    })
}

impl Snapshot {
    #[must_use]
    pub fn new(
        skills: Vec<Skill>,
        series: Vec<SeriesEntry>,
        values: ValuesTable,
        analysis: AnalysisTable,
        config: &ReportConfig,
    ) -> Self {
        let resolution = Resolution::detect(&values);
        log::debug!(
            "snapshot: {} skills, {} series, {} value tables, {} analyses, {resolution:?}",
            skills.len(),
            series.len(),
            values.len(),
            analysis.len()
        );
        Self {
            skills,
            series,
            values,
            analysis,
            resolution,
            jump_threshold: config.jump_threshold,
        }
    }

    /// Snapshot over skills with embedded values only.
    #[must_use]
    pub fn from_skills(skills: Vec<Skill>, config: &ReportConfig) -> Self {
        Self::new(
            skills,
            Vec::new(),
            ValuesTable::new(),
            AnalysisTable::new(),
            config,
        )
    }

    /// Parse all four documents.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] naming the first document that is not valid.
    pub fn from_documents(docs: &RawDocuments, config: &ReportConfig) -> Result<Self, LoadError> {
        Ok(Self::new(
            parse(DocumentKind::Skills, &docs.skills)?,
            parse(DocumentKind::Series, &docs.series)?,
            parse(DocumentKind::Values, &docs.values)?,
            parse(DocumentKind::Analysis, &docs.analysis)?,
            config,
        ))
    }

    #[must_use]
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    #[must_use]
    pub fn series(&self) -> &[SeriesEntry] {
        &self.series
    }

    #[must_use]
    pub const fn values(&self) -> &ValuesTable {
        &self.values
    }

    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[must_use]
    pub fn skill(&self, skill_id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.skill_id == skill_id)
    }

    /// Display name of a skill, or an empty string for unknown ids.
    #[must_use]
    pub fn skill_name(&self, skill_id: &str) -> &str {
        self.skill(skill_id).map_or("", |s| s.name.as_str())
    }

    #[must_use]
    pub fn analysis(&self, series_id: &str) -> Option<&Analysis> {
        self.analysis.get(series_id)
    }

    #[must_use]
    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.resolution, &self.values, self.jump_threshold)
    }
}
