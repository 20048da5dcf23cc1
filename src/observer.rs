//! Progress hooks for long builds and probe-heavy queries.
//!
//! The index never prints. Callers that want progress bars, metrics, or
//! cancellation implement [`ProgressObserver`] and pass it to
//! `IvfFlatIndex::build_observed` / `IvfFlatIndex::search_observed`. Every
//! method has a no-op default.

use std::ops::ControlFlow;
use std::time::Duration;

/// Summary of one completed build iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// Zero-based iteration number.
    pub iteration: usize,
    /// Configured number of iterations.
    pub iter_count: usize,
    /// Clusters that received no points and were reseeded.
    pub empty_clusters: usize,
    /// Size of the largest cluster after assignment.
    pub largest_cluster: usize,
    /// Time spent in this iteration, checkpoint included.
    pub elapsed: Duration,
}

/// One cluster visited by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    /// Cluster that was just scanned.
    pub cluster: u32,
    /// Clusters probed so far, this one included.
    pub probed: usize,
    /// Candidate pool size after this probe.
    pub candidates: usize,
}

/// Receives build and query progress.
pub trait ProgressObserver {
    /// Called periodically during the assignment step with points assigned so far.
    fn on_assignment_progress(&mut self, _assigned: usize, _total: usize) {}

    /// Called after each build iteration (and its checkpoint).
    ///
    /// Returning `ControlFlow::Break(())` stops the build here; the index keeps
    /// the state of this iteration.
    fn on_iteration(&mut self, _report: &IterationReport) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called after each cluster a query probes.
    fn on_probe(&mut self, _report: &ProbeReport) {}
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

impl<O: ProgressObserver + ?Sized> ProgressObserver for &mut O {
    fn on_assignment_progress(&mut self, assigned: usize, total: usize) {
        (**self).on_assignment_progress(assigned, total)
    }

    fn on_iteration(&mut self, report: &IterationReport) -> ControlFlow<()> {
        (**self).on_iteration(report)
    }

    fn on_probe(&mut self, report: &ProbeReport) {
        (**self).on_probe(report)
    }
}

/// Forwards progress to the `log` facade at `info`/`trace` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_assignment_progress(&mut self, assigned: usize, total: usize) {
        log::trace!("assigned {assigned}/{total} points");
    }

    fn on_iteration(&mut self, report: &IterationReport) -> ControlFlow<()> {
        log::info!(
            "iteration {}/{} done in {:.2?} ({} empty clusters, largest {})",
            report.iteration + 1,
            report.iter_count,
            report.elapsed,
            report.empty_clusters,
            report.largest_cluster,
        );
        ControlFlow::Continue(())
    }

    fn on_probe(&mut self, report: &ProbeReport) {
        log::trace!(
            "probed cluster {} ({} probed, {} candidates)",
            report.cluster,
            report.probed,
            report.candidates
        );
    }
}

/// Stops a build after a fixed number of iterations.
#[derive(Debug, Clone, Copy)]
pub struct StopAfter(pub usize);

impl ProgressObserver for StopAfter {
    fn on_iteration(&mut self, report: &IterationReport) -> ControlFlow<()> {
        if report.iteration + 1 >= self.0 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}
