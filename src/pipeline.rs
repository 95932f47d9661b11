//! End-to-end migration analysis of a planform series.
//!
//! Stages run in a fixed order, each consuming the complete output of the
//! previous one:
//!
//! 1. filter curvature
//! 2. detect inflections
//! 3. correlate inflections survey to survey
//! 4. label bends from the correlated inflections
//! 5. correlate bends by majority vote
//! 6. classify point roles within each bend
//! 7. compute displacement per correlated bend
//!
//! The results are bundled per survey in a [`SurveyRecord`].

use crate::bends::{
    apex_index, classify_bends, correlate_bends, detect_inflections, label_bends, BendId, BendRole,
};
use crate::config::{FilterMode, MigrationConfig};
use crate::correlate::{correlate_inflections, correlator_for, InflectionCorrelator, PairLinks};
use crate::error::Result;
use crate::filter::{CurvatureFilter, WaveletTransform};
use crate::migration::{compute_migration, BendStatus, Displacement, PairMigration};
use crate::planform::PlanformSeries;
use crate::primitives::{centroid, Point2};
use serde::Serialize;
use std::sync::Arc;

/// Summary of one bend of a survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BendSummary {
    pub id: BendId,
    /// First point (upstream inflection).
    pub start: usize,
    /// Downstream inflection; the bend's points are `start..end`.
    pub end: usize,
    /// Point of maximum filtered curvature magnitude in `start..=end`.
    pub apex: usize,
    /// Matching bend in the next survey.
    pub successor: Option<BendId>,
    /// Arc length over chord length.
    pub sinuosity: f64,
    pub centroid: Option<Point2<f64>>,
    pub status: BendStatus,
}

/// Everything computed for one survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyRecord {
    /// Denoised curvature, one value per point.
    pub filtered_curvature: Vec<f64>,
    /// Inflections detected on this survey's own curvature.
    pub inflections: Vec<usize>,
    /// Inflections tracked into the next survey (bend boundaries).
    pub correlated: Vec<usize>,
    /// Where `correlated` lands in the next survey; equal to `correlated`
    /// for the last survey.
    pub matched: Vec<usize>,
    /// Bend id of each point.
    pub bend_labels: Vec<Option<BendId>>,
    /// Successor bend of each bend in the next survey.
    pub successors: Vec<Option<BendId>>,
    /// Role of each point within its bend.
    pub roles: Vec<Option<BendRole>>,
    /// Displacement of each point towards the next survey.
    pub displacement: Displacement,
    pub bends: Vec<BendSummary>,
}

impl SurveyRecord {
    /// Bend labels with `-1` for points outside every bend.
    pub fn labels_signed(&self) -> Vec<i64> {
        crate::bends::signed_labels(&self.bend_labels)
    }

    /// Bend successors with `-1` for uncorrelated bends.
    pub fn successors_signed(&self) -> Vec<i64> {
        crate::bends::signed_labels(&self.successors)
    }

    /// Role codes (2, 0, -1, +1), `None` outside every bend.
    pub fn role_codes(&self) -> Vec<Option<i8>> {
        self.roles.iter().map(|r| r.map(BendRole::code)).collect()
    }
}

/// Output of [`MigrationPipeline::run`], one record per survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationResult {
    pub surveys: Vec<SurveyRecord>,
}

impl MigrationResult {
    /// Number of surveys.
    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    /// Returns `true` if there are no surveys.
    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }

    /// Follows bend `bend` of survey `survey` downstream in time, returning
    /// `(survey, bend)` for as long as successors exist.
    pub fn track_bend(&self, survey: usize, bend: BendId) -> Vec<(usize, BendId)> {
        let mut chain = Vec::new();
        let mut current = Some(bend);
        for (t, record) in self.surveys.iter().enumerate().skip(survey) {
            let Some(b) = current else { break };
            chain.push((t, b));
            current = record.successors.get(b).copied().flatten();
        }
        chain
    }
}

/// Configured migration analysis.
pub struct MigrationPipeline {
    config: MigrationConfig,
    correlator: Box<dyn InflectionCorrelator>,
    wavelet: Option<Arc<dyn WaveletTransform>>,
}

impl MigrationPipeline {
    /// Builds a pipeline from `config`. The correlation strategy and filter
    /// mode are fixed from here on.
    pub fn new(config: MigrationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            correlator: correlator_for(&config),
            config,
            wavelet: None,
        })
    }

    /// Supplies the wavelet transform used by [`FilterMode::Wavelet`].
    pub fn with_wavelet(mut self, transform: impl WaveletTransform + 'static) -> Self {
        self.wavelet = Some(Arc::new(transform));
        self
    }

    /// Replaces the inflection correlation strategy.
    pub fn with_correlator(mut self, correlator: Box<dyn InflectionCorrelator>) -> Self {
        self.correlator = correlator;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// The curvature filter selected by the configuration.
    pub fn filter(&self) -> CurvatureFilter {
        match self.config.filter {
            FilterMode::Average => CurvatureFilter::average(),
            FilterMode::Wavelet => {
                CurvatureFilter::wavelet(self.wavelet.clone(), self.config.wavelet_reduction)
            }
        }
    }

    /// Runs every stage over `series`.
    pub fn run(&self, series: &PlanformSeries) -> Result<MigrationResult> {
        let filtered = self.filter().filter_series(series)?;

        let raw: Vec<Vec<usize>> = filtered.iter().map(|c| detect_inflections(c)).collect();
        tracing::info!(
            surveys = series.len(),
            inflections = raw.iter().map(Vec::len).sum::<usize>(),
            "inflections detected"
        );

        let links = correlate_inflections(series, &raw, self.correlator.as_ref());

        let labels: Vec<Vec<Option<BendId>>> = series
            .planforms()
            .iter()
            .zip(&links)
            .map(|(p, l)| label_bends(p.len(), &l.source))
            .collect();

        let successors = correlate_bends(&links, &labels);

        let roles: Vec<Vec<Option<BendRole>>> = links
            .iter()
            .zip(&filtered)
            .map(|(l, c)| classify_bends(&l.source, c))
            .collect();

        let migration = compute_migration(series, &links, &labels, &successors, &self.config);
        tracing::info!(
            bends = links.iter().map(PairLinks::bend_count).sum::<usize>(),
            migrated = migration
                .iter()
                .flat_map(|m| &m.bends)
                .filter(|b| b.status == BendStatus::Migrated)
                .count(),
            "migration computed"
        );

        let surveys = series
            .planforms()
            .iter()
            .zip(filtered)
            .zip(raw)
            .zip(links)
            .zip(labels)
            .zip(successors)
            .zip(roles)
            .zip(migration)
            .map(
                |(((((((planform, filtered), raw), links), labels), successors), roles), migration)| {
                    let bends = summarize_bends(planform.points(), &filtered, &links, &successors, &migration);
                    SurveyRecord {
                        filtered_curvature: filtered,
                        inflections: raw,
                        correlated: links.source,
                        matched: links.target,
                        bend_labels: labels,
                        successors,
                        roles,
                        displacement: migration.displacement,
                        bends,
                    }
                },
            )
            .collect();

        Ok(MigrationResult { surveys })
    }
}

fn summarize_bends(
    points: &[Point2<f64>],
    curvature: &[f64],
    links: &PairLinks,
    successors: &[Option<BendId>],
    migration: &PairMigration,
) -> Vec<BendSummary> {
    (0..links.bend_count())
        .filter_map(|id| {
            let (start, end) = links.bend_bounds(id)?;
            let outcome = migration.bends.iter().find(|b| b.bend == id);
            Some(BendSummary {
                id,
                start,
                end,
                apex: apex_index(curvature, start, end),
                successor: successors.get(id).copied().flatten(),
                sinuosity: outcome.map_or(f64::NAN, |o| o.sinuosity),
                centroid: centroid(&points[start..end]),
                status: outcome.map_or(BendStatus::Uncorrelated, |o| o.status),
            })
        })
        .collect()
}
