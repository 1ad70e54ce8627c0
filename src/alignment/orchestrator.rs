//! Incremental construction of the global frame
//!
//! The first scanner defines the global frame. Every step searches the
//! unaligned scanners, in input order, for one that overlaps an aligned scanner
//! and promotes it. The aligned pool only grows and the unaligned pool only
//! shrinks, so at most `scanners.len() - 1` steps are ever needed.

use crate::alignment::{AlignedScanner, PairAligner, PairMatch, PairMatcher, Scanner};
use crate::config::AlignmentConfig;
use crate::error::{AlignmentError, AlignmentResult};
use crate::geometry::PointSet;
use crate::logging::{self, AlignmentSpan, MetricsCollector};
use instant::Instant;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// Result of a single orchestrator step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// One scanner moved from the unaligned to the aligned pool
    Promoted {
        scanner_index: usize,
        aligned_against: usize,
        overlap: usize,
    },
    /// Nothing left to align
    Complete,
}

/// The two scanner pools plus the record of pairs already known not to overlap
pub struct AlignmentState<'s> {
    scanners: &'s [Scanner],
    local_beacons: Vec<PointSet>,
    aligned: Vec<AlignedScanner>,
    unaligned: Vec<usize>,
    failed_pairs: HashSet<(usize, usize)>,
    cache_failed_pairs: bool,
}

impl<'s> AlignmentState<'s> {
    /// Align the first scanner with the identity; everything else starts unaligned
    pub fn new(scanners: &'s [Scanner], cache_failed_pairs: bool) -> AlignmentResult<Self> {
        let root = scanners.first().ok_or(AlignmentError::NoScanners)?;

        Ok(Self {
            scanners,
            local_beacons: scanners
                .iter()
                .map(|scanner| scanner.beacons.iter().copied().collect())
                .collect(),
            aligned: vec![AlignedScanner::root(0, root)],
            unaligned: (1..scanners.len()).collect(),
            failed_pairs: HashSet::new(),
            cache_failed_pairs,
        })
    }

    pub fn aligned(&self) -> &[AlignedScanner] {
        &self.aligned
    }

    /// Input indices of the scanners still waiting for a transform
    pub fn unaligned(&self) -> &[usize] {
        &self.unaligned
    }

    pub fn unaligned_names(&self) -> Vec<String> {
        self.unaligned
            .iter()
            .map(|&index| self.scanners[index].name.clone())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.unaligned.is_empty()
    }

    pub fn total_scanners(&self) -> usize {
        self.scanners.len()
    }

    /// Promote the first unaligned scanner that overlaps any aligned scanner.
    ///
    /// Fails with `AlignmentStalled` when a full pass finds no overlapping pair.
    pub fn step<M: PairMatcher + ?Sized>(
        &mut self,
        matcher: &M,
        parallel: bool,
        metrics: Option<&MetricsCollector>,
    ) -> AlignmentResult<StepOutcome> {
        if self.is_complete() {
            return Ok(StepOutcome::Complete);
        }

        for position in 0..self.unaligned.len() {
            let scanner_index = self.unaligned[position];
            let pool: Vec<usize> = (0..self.aligned.len())
                .filter(|&slot| !self.failed_pairs.contains(&(scanner_index, self.aligned[slot].scanner_index)))
                .collect();

            let found = self.find_match(matcher, scanner_index, &pool, parallel, metrics);

            // Everything ahead of the winner in pool order was evaluated and failed.
            let failed_slots = match &found {
                Some((tried, _, _)) => &pool[..*tried],
                None => &pool[..],
            };
            if self.cache_failed_pairs {
                for &slot in failed_slots {
                    self.failed_pairs
                        .insert((scanner_index, self.aligned[slot].scanner_index));
                }
            }

            if let Some((_, slot, matched)) = found {
                return Ok(self.promote(position, slot, matched));
            }
        }

        Err(AlignmentError::AlignmentStalled {
            remaining: self.unaligned_names(),
        })
    }

    /// Returns (position in `pool`, aligned slot, match) of the first overlapping aligned scanner
    fn find_match<M: PairMatcher + ?Sized>(
        &self,
        matcher: &M,
        scanner_index: usize,
        pool: &[usize],
        parallel: bool,
        metrics: Option<&MetricsCollector>,
    ) -> Option<(usize, usize, PairMatch)> {
        let candidate = &self.local_beacons[scanner_index];
        // Read on the calling thread; rayon workers have no correlation id of their own.
        let correlation_id = logging::get_correlation_id();
        let trial = |(tried, &slot): (usize, &usize)| {
            let start = Instant::now();
            let outcome = matcher.try_align(self.aligned[slot].global_beacons(), candidate);
            if let Some(metrics) = metrics {
                metrics.record("pair_trial", start.elapsed(), correlation_id);
            }
            outcome.map(|matched| (tried, slot, matched))
        };

        if parallel {
            pool.par_iter().enumerate().find_map_first(trial)
        } else {
            pool.iter().enumerate().find_map(trial)
        }
    }

    fn promote(&mut self, position: usize, slot: usize, matched: PairMatch) -> StepOutcome {
        let scanner_index = self.unaligned.remove(position);
        let aligned_against = self.aligned[slot].scanner_index;
        let overlap = matched.overlap;

        self.aligned.push(AlignedScanner::from_match(
            scanner_index,
            &self.scanners[scanner_index],
            aligned_against,
            matched,
        ));

        StepOutcome::Promoted {
            scanner_index,
            aligned_against,
            overlap,
        }
    }

    pub fn into_aligned(self) -> Vec<AlignedScanner> {
        self.aligned
    }
}

/// Drives `AlignmentState` to completion with a given pair matcher
pub struct AlignmentOrchestrator<M: PairMatcher = PairAligner> {
    matcher: M,
    config: AlignmentConfig,
    metrics: Option<Arc<MetricsCollector>>,
}

impl AlignmentOrchestrator<PairAligner> {
    pub fn new(config: AlignmentConfig) -> Self {
        Self::with_matcher(PairAligner::from_config(&config), config)
    }
}

impl<M: PairMatcher> AlignmentOrchestrator<M> {
    pub fn with_matcher(matcher: M, config: AlignmentConfig) -> Self {
        Self {
            matcher,
            config,
            metrics: None,
        }
    }

    /// Record per-pair trial durations and the total run time
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Align every scanner into the frame of the first one
    pub fn align(&self, scanners: &[Scanner]) -> AlignmentResult<Vec<AlignedScanner>> {
        let correlation_id = logging::new_correlation_id();
        let span = AlignmentSpan::new(
            scanners.len(),
            self.matcher.name(),
            self.matcher.overlap_threshold(),
            Some(correlation_id),
        );
        let _entered = span.enter();
        let start = Instant::now();

        let result = self.run(scanners, &span);

        if let Some(metrics) = &self.metrics {
            metrics.record("alignment_run", start.elapsed(), Some(correlation_id));
        }
        match &result {
            Ok(aligned) => span.record_result(true, aligned.len(), "all scanners aligned"),
            Err(e) => span.record_result(false, 0, &e.to_string()),
        }
        logging::clear_correlation_id();

        result
    }

    fn run(&self, scanners: &[Scanner], span: &AlignmentSpan) -> AlignmentResult<Vec<AlignedScanner>> {
        let mut state = AlignmentState::new(scanners, self.config.cache_failed_pairs)?;

        // Each successful step promotes exactly one scanner.
        for _ in 0..scanners.len() {
            match state.step(&self.matcher, self.config.parallel, self.metrics.as_deref())? {
                StepOutcome::Promoted {
                    scanner_index,
                    aligned_against,
                    overlap,
                } => {
                    if let Some(promoted) = state.aligned().last() {
                        span.record_promotion(
                            &scanners[scanner_index].name,
                            &scanners[aligned_against].name,
                            &promoted.transform,
                            overlap,
                        );
                    }
                    debug_assert_eq!(state.aligned().len() + state.unaligned().len(), state.total_scanners());
                }
                StepOutcome::Complete => break,
            }
        }

        if !state.is_complete() {
            return Err(AlignmentError::AlignmentStalled {
                remaining: state.unaligned_names(),
            });
        }

        Ok(state.into_aligned())
    }
}

/// Align `scanners` with the default pair matcher
pub fn align(scanners: &[Scanner], config: &AlignmentConfig) -> AlignmentResult<Vec<AlignedScanner>> {
    AlignmentOrchestrator::new(config.clone()).align(scanners)
}
