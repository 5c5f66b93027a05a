//! Series resolution across the two document shapes.
//!
//! Skill groups either embed their numbers (`{label, values}`) or name a
//! series whose points live in the values document under
//! `<skill_id>:<label>`. Aggregation only talks to [`SeriesResolver`].
use std::borrow::Cow;

use crate::analyzer::value_points;
use crate::data::{LabeledSeries, ValuePoint, ValuesTable, series_id};

pub trait SeriesResolver {
    /// Raw numbers of a series, in level order.
    fn values<'s>(&'s self, skill_id: &str, series: &'s LabeledSeries) -> Cow<'s, [f64]>;

    /// Level-by-level points of a series, in source order.
    fn points<'s>(&'s self, skill_id: &str, series: &'s LabeledSeries) -> Cow<'s, [ValuePoint]>;
}

/// Reads embedded values and derives points with the analyzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineResolver {
    pub jump_threshold: f64,
}

impl SeriesResolver for InlineResolver {
    fn values<'s>(&'s self, _skill_id: &str, series: &'s LabeledSeries) -> Cow<'s, [f64]> {
        Cow::Borrowed(series.embedded())
    }

    fn points<'s>(&'s self, _skill_id: &str, series: &'s LabeledSeries) -> Cow<'s, [ValuePoint]> {
        Cow::Owned(value_points(series.embedded(), self.jump_threshold))
    }
}

/// Reads points from the values document.
///
/// Raw values come from the series itself when it embeds them; the table is
/// only consulted for reference-only series. Repeated labels are stored as
/// `<label>#2` in the values document, so a label lookup would return the
/// first series for both.
#[derive(Debug, Clone, Copy)]
pub struct LookupResolver<'a> {
    pub table: &'a ValuesTable,
    pub fallback: InlineResolver,
}

impl LookupResolver<'_> {
    fn lookup(&self, skill_id: &str, series: &LabeledSeries) -> Option<&[ValuePoint]> {
        self.table
            .get(&series_id(skill_id, &series.label))
            .map(Vec::as_slice)
    }
}

impl SeriesResolver for LookupResolver<'_> {
    fn values<'s>(&'s self, skill_id: &str, series: &'s LabeledSeries) -> Cow<'s, [f64]> {
        if series.values.is_some() {
            return self.fallback.values(skill_id, series);
        }
        match self.lookup(skill_id, series) {
            Some(points) => Cow::Owned(points.iter().map(|p| p.value).collect()),
            None => Cow::Borrowed(&[]),
        }
    }

    fn points<'s>(&'s self, skill_id: &str, series: &'s LabeledSeries) -> Cow<'s, [ValuePoint]> {
        match self.lookup(skill_id, series) {
            Some(points) => Cow::Borrowed(points),
            None => self.fallback.points(skill_id, series),
        }
    }
}

/// Which adapter a snapshot resolves series with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Inline,
    Lookup,
}

impl Resolution {
    /// Pick the lookup adapter whenever the values document has entries.
    #[must_use]
    pub fn detect(values: &ValuesTable) -> Self {
        if values.is_empty() {
            Self::Inline
        } else {
            Self::Lookup
        }
    }
}

/// Adapter chosen for a snapshot.
#[derive(Debug, Clone, Copy)]
pub enum Resolver<'a> {
    Inline(InlineResolver),
    Lookup(LookupResolver<'a>),
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub const fn new(resolution: Resolution, table: &'a ValuesTable, jump_threshold: f64) -> Self {
        let inline = InlineResolver { jump_threshold };
        match resolution {
            Resolution::Inline => Self::Inline(inline),
            Resolution::Lookup => Self::Lookup(LookupResolver {
                table,
                fallback: inline,
            }),
        }
    }
}

impl SeriesResolver for Resolver<'_> {
    fn values<'s>(&'s self, skill_id: &str, series: &'s LabeledSeries) -> Cow<'s, [f64]> {
        match self {
            Self::Inline(r) => r.values(skill_id, series),
            Self::Lookup(r) => r.values(skill_id, series),
        }
    }

    fn points<'s>(&'s self, skill_id: &str, series: &'s LabeledSeries) -> Cow<'s, [ValuePoint]> {
        match self {
            Self::Inline(r) => r.points(skill_id, series),
            Self::Lookup(r) => r.points(skill_id, series),
        }
    }
}
