//! Structured span for an alignment run

use crate::geometry::Transform;
use std::time::Instant;
use tracing::field::Empty;
use tracing::span::Entered;
use tracing::{span, Level, Span};
use uuid::Uuid;

/// Span covering one call to the orchestrator
pub struct AlignmentSpan {
    span: Span,
    start_time: Instant,
    scanner_count: usize,
}

impl AlignmentSpan {
    pub fn new(scanner_count: usize, matcher: &str, overlap_threshold: usize, correlation_id: Option<Uuid>) -> Self {
        let span = span!(
            Level::INFO,
            "scanner_alignment",
            scanners = scanner_count,
            matcher = matcher,
            overlap_threshold = overlap_threshold,
            correlation_id = Empty,
            promotions = Empty,
            success = Empty,
            execution_time_ms = Empty,
        );
        if let Some(id) = correlation_id {
            span.record("correlation_id", tracing::field::display(id));
        }

        Self {
            span,
            start_time: Instant::now(),
            scanner_count,
        }
    }

    pub fn enter(&self) -> Entered<'_> {
        self.span.enter()
    }

    /// Record a scanner moving into the aligned pool
    pub fn record_promotion(&self, scanner: &str, against: &str, transform: &Transform, overlap: usize) {
        tracing::debug!(
            parent: &self.span,
            scanner = scanner,
            against = against,
            rotation = transform.rotation.index(),
            position = %transform.translation,
            overlap = overlap,
            "Scanner aligned"
        );
    }

    /// Record the final outcome
    pub fn record_result(&self, success: bool, aligned: usize, description: &str) {
        let duration = self.start_time.elapsed();
        self.span.record("success", success);
        self.span.record("promotions", aligned.saturating_sub(1));
        self.span.record("execution_time_ms", duration.as_millis() as u64);

        if success {
            tracing::info!(
                parent: &self.span,
                aligned = aligned,
                scanners = self.scanner_count,
                execution_time_ms = duration.as_millis() as u64,
                "{}",
                description
            );
        } else {
            tracing::error!(
                parent: &self.span,
                scanners = self.scanner_count,
                execution_time_ms = duration.as_millis() as u64,
                "Alignment failed: {}",
                description
            );
        }
    }
}
