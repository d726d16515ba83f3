//! Exact branch-and-bound solver for the balance model.
//!
//! Participants sharing a level are interchangeable in the model, so the
//! solver branches on per-level group counts `count[L][g]` instead of the
//! individual `x[i][g]` decisions. Cells are decided level by level
//! (strongest first) and group by group. Every partial state is bounded by
//! [`SpreadBounder`]; a branch is pruned when its bound cannot beat the
//! incumbent.
//!
//! The distributions of the first level form the root branches. With
//! [`Parallelism::Threads`] they are explored on a `rayon` pool sharing one
//! incumbent objective. The returned optimum is the best objective found,
//! ties broken by root order, so completed searches are deterministic.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use rayon::prelude::*;
use smallvec::{smallvec, SmallVec};
use teamforge_config::{ExactConfig, SolverThreads};
use teamforge_core::{LevelCounts, SkillLevel};
use tracing::{debug, trace, warn};

use super::bounder::SpreadBounder;
use super::{ModelSolver, SolveOutcome, SolveStats, SolveStatus};
use crate::model::BalanceModel;
use crate::termination::{
    NodeCountTermination, OrTermination, SearchProgress, Termination, TimeTermination,
};

/// Nodes between two termination checks.
const CHECK_INTERVAL: u64 = 64;

type Row = SmallVec<[usize; 8]>;

/// How root branches are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Explore every root on the calling thread.
    #[default]
    Sequential,
    /// Explore roots on a dedicated pool; 0 lets rayon pick the size.
    Threads(usize),
}

impl From<&SolverThreads> for Parallelism {
    fn from(threads: &SolverThreads) -> Self {
        match threads {
            SolverThreads::Auto => Parallelism::Threads(0),
            SolverThreads::None => Parallelism::Sequential,
            SolverThreads::Count(n) => Parallelism::Threads(*n),
        }
    }
}

/// Exact solver for [`BalanceModel`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use teamforge_core::SkillLevel;
/// use teamforge_solver::model::BalanceModelBuilder;
/// use teamforge_solver::solve::{BranchAndBoundSolver, ModelSolver, SolveStatus};
///
/// let levels = [1, 1, 2, 2, 3, 3, 4, 4, 4].map(|v| SkillLevel::new(v).unwrap());
/// let model = BalanceModelBuilder::new(vec![3, 3, 3])
///     .participants(levels)
///     .build()
///     .unwrap();
///
/// let outcome = BranchAndBoundSolver::new().solve(&model, Duration::from_secs(1));
/// assert_eq!(outcome.status, SolveStatus::Optimal);
/// assert!(model.is_feasible(outcome.assignment.as_ref().unwrap()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBoundSolver {
    node_limit: Option<u64>,
    parallelism: Parallelism,
}

impl BranchAndBoundSolver {
    /// Creates a sequential solver without a node limit.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExactConfig) -> Self {
        Self {
            node_limit: config.node_limit,
            parallelism: Parallelism::from(&config.solver_threads),
        }
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    fn explore<T: Termination>(
        &self,
        plan: &SearchPlan,
        roots: &[Row],
        search: &SharedSearch<'_, T>,
    ) -> Vec<RootResult> {
        let run = |(index, row): (usize, &Row)| -> Option<RootResult> {
            let mut worker = Worker::new(plan, search);
            worker.run_root(row);
            worker.best.map(|best| RootResult {
                objective: best.objective,
                root: index,
                counts: best.counts,
            })
        };

        match self.parallelism {
            Parallelism::Sequential => roots.iter().enumerate().filter_map(run).collect(),
            Parallelism::Threads(n) => {
                match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                    Ok(pool) => {
                        pool.install(|| roots.par_iter().enumerate().filter_map(run).collect())
                    }
                    Err(err) => {
                        warn!(
                            event = "thread_pool_unavailable",
                            error = %err,
                            "searching on the calling thread"
                        );
                        roots.iter().enumerate().filter_map(run).collect()
                    }
                }
            }
        }
    }
}

impl ModelSolver for BranchAndBoundSolver {
    fn solve(&self, model: &BalanceModel, time_budget: Duration) -> SolveOutcome {
        let progress = SearchProgress::start();
        let termination = OrTermination::new(
            TimeTermination::new(time_budget),
            self.node_limit.map(NodeCountTermination::new),
        );
        let plan = SearchPlan::new(model);
        let roots = plan.first_level_rows(model);

        debug!(
            event = "solve_start",
            solver = self.solver_name(),
            participants = model.participant_count(),
            groups = model.group_count(),
            levels = plan.steps.len(),
            roots = roots.len(),
            time_budget_ms = time_budget.as_millis() as u64,
        );

        let search = SharedSearch {
            model,
            bounder: SpreadBounder::new(model),
            termination: &termination,
            progress: &progress,
            incumbent: AtomicI64::new(i64::MAX),
        };
        let results = self.explore(&plan, &roots, &search);
        let best = results
            .into_iter()
            .min_by_key(|result| (result.objective, result.root));

        let stats = SolveStats {
            nodes_explored: progress.node_count(),
            elapsed: progress.elapsed(),
        };
        let stopped = progress.is_stopped();

        let outcome = match best {
            None if stopped => SolveOutcome::failed(SolveStatus::TimedOut, stats),
            None => SolveOutcome::failed(SolveStatus::Infeasible, stats),
            Some(best) => {
                let group_counts = plan.group_counts(&best.counts);
                let assignment = model.assignment_from_counts(&group_counts);
                match model.evaluate(&assignment) {
                    Some(objective) => SolveOutcome {
                        status: if stopped {
                            SolveStatus::Feasible
                        } else {
                            SolveStatus::Optimal
                        },
                        assignment: Some(assignment),
                        objective: Some(objective),
                        stats,
                    },
                    None => {
                        warn!(
                            event = "solve_inconsistent",
                            "search result violates the model; discarding it"
                        );
                        SolveOutcome::failed(SolveStatus::Infeasible, stats)
                    }
                }
            }
        };

        debug!(
            event = "solve_end",
            solver = self.solver_name(),
            status = %outcome.status,
            nodes = stats.nodes_explored,
            duration_ms = stats.elapsed.as_millis() as u64,
            objective = outcome.objective.map(|o| o.value()),
        );
        outcome
    }

    fn solver_name(&self) -> &'static str {
        "BranchAndBound"
    }
}

/// One level as seen by the search.
#[derive(Debug, Clone, Copy)]
struct LevelStep {
    level: SkillLevel,
    value: i64,
    total: usize,
    lo: usize,
    hi: usize,
}

/// Per-solve constants derived from the model.
#[derive(Debug)]
struct SearchPlan {
    steps: Vec<LevelStep>,
    /// Sum of `lo` over the steps after `k`.
    future_min: Vec<usize>,
    /// Sum of `hi` over the steps after `k`.
    future_max: Vec<usize>,
    /// Least possible level penalty of the steps after `k`.
    future_penalty: Vec<i64>,
    groups: usize,
    weakest_value: i64,
}

impl SearchPlan {
    fn new(model: &BalanceModel) -> Self {
        let groups = model.group_count();
        let steps: Vec<LevelStep> = model
            .level_totals()
            .present_levels()
            .map(|level| {
                let (lo, hi) = model.cell_range(level);
                LevelStep {
                    level,
                    value: i64::from(level.value()),
                    total: model.level_totals()[level],
                    lo,
                    hi,
                }
            })
            .collect();

        let n = steps.len();
        let mut future_min = vec![0; n];
        let mut future_max = vec![0; n];
        let mut future_penalty = vec![0; n];
        for k in (0..n.saturating_sub(1)).rev() {
            let next = &steps[k + 1];
            future_min[k] = future_min[k + 1] + next.lo;
            future_max[k] = future_max[k + 1] + next.hi;
            future_penalty[k] = future_penalty[k + 1] + even_split_penalty(model, next, groups);
        }

        let weakest_value = steps.last().map(|s| s.value).unwrap_or(0);
        Self {
            steps,
            future_min,
            future_max,
            future_penalty,
            groups,
            weakest_value,
        }
    }

    /// Candidate counts for cell `(k, g)` given `left` participants of the level.
    ///
    /// Ordered by closeness to the even share so good incumbents come early.
    fn candidates(&self, model: &BalanceModel, k: usize, g: usize, left: usize) -> Row {
        let step = &self.steps[k];
        let later = self.groups - g - 1;
        let (from, to) = if later == 0 {
            (left, left)
        } else {
            (step.lo, step.hi.min(left))
        };
        let mut out: Row = SmallVec::new();
        if from > to || from < step.lo || to > step.hi {
            return out;
        }
        for c in from..=to {
            let rest = left - c;
            if rest >= later * step.lo && rest <= later * step.hi {
                out.push(c);
            }
        }
        out.sort_by_key(|&c| (model.level_cell_penalty(step.level, c), c));
        out
    }

    /// All admissible distributions of the first level, best share first.
    fn first_level_rows(&self, model: &BalanceModel) -> Vec<Row> {
        let mut rows = Vec::new();
        if self.steps.is_empty() {
            return rows;
        }
        let mut row: Row = smallvec![0; self.groups];
        self.fill_row(model, 0, self.steps[0].total, &mut row, &mut rows);
        rows.sort_by_key(|row| {
            let penalty: i64 = row
                .iter()
                .map(|&c| model.level_cell_penalty(self.steps[0].level, c))
                .sum();
            penalty
        });
        rows
    }

    fn fill_row(
        &self,
        model: &BalanceModel,
        g: usize,
        left: usize,
        row: &mut Row,
        out: &mut Vec<Row>,
    ) {
        let capacity = model.capacities()[g];
        for c in self.candidates(model, 0, g, left) {
            if c > capacity {
                continue;
            }
            let remaining = capacity - c;
            if remaining < self.future_min[0] || remaining > self.future_max[0] {
                continue;
            }
            row[g] = c;
            if g + 1 == self.groups {
                out.push(row.clone());
            } else {
                self.fill_row(model, g + 1, left - c, row, out);
            }
        }
    }

    /// Converts `[k][g]` cell counts to per-group level counts.
    fn group_counts(&self, cells: &[Row]) -> Vec<LevelCounts> {
        let mut counts = vec![LevelCounts::default(); self.groups];
        for (step, row) in self.steps.iter().zip(cells) {
            for (g, &c) in row.iter().enumerate() {
                counts[g][step.level] = c;
            }
        }
        counts
    }
}

/// Least level penalty of one level: `r` groups at `q + 1`, the rest at `q`.
fn even_split_penalty(model: &BalanceModel, step: &LevelStep, groups: usize) -> i64 {
    let q = step.total / groups;
    let r = step.total % groups;
    r as i64 * model.level_cell_penalty(step.level, q + 1)
        + (groups - r) as i64 * model.level_cell_penalty(step.level, q)
}

/// State shared by every worker of one solve.
struct SharedSearch<'a, T> {
    model: &'a BalanceModel,
    bounder: SpreadBounder,
    termination: &'a T,
    progress: &'a SearchProgress,
    incumbent: AtomicI64,
}

struct Incumbent {
    objective: i64,
    counts: Vec<Row>,
}

struct RootResult {
    objective: i64,
    root: usize,
    counts: Vec<Row>,
}

/// Mutable depth-first state.
struct State {
    /// `[k][g]` decided cell counts.
    cells: Vec<Row>,
    sums: SmallVec<[i64; 8]>,
    remaining: Row,
    /// Participants of the current level not yet placed.
    level_left: usize,
    /// Scaled level penalty of the decided cells.
    penalty: i64,
}

/// Depth-first search of one root branch.
struct Worker<'a, 's, T> {
    plan: &'a SearchPlan,
    search: &'a SharedSearch<'s, T>,
    best: Option<Incumbent>,
    ranges: SmallVec<[(i64, i64); 8]>,
}

impl<'a, 's, T: Termination> Worker<'a, 's, T> {
    fn new(plan: &'a SearchPlan, search: &'a SharedSearch<'s, T>) -> Self {
        Self {
            plan,
            search,
            best: None,
            ranges: SmallVec::new(),
        }
    }

    fn run_root(&mut self, row: &Row) {
        let model = self.search.model;
        let step = self.plan.steps[0];
        let groups = self.plan.groups;

        let mut state = State {
            cells: vec![smallvec![0; groups]; self.plan.steps.len()],
            sums: smallvec![0; groups],
            remaining: model.capacities().iter().copied().collect(),
            level_left: 0,
            penalty: 0,
        };
        for (g, &c) in row.iter().enumerate() {
            state.cells[0][g] = c;
            state.sums[g] = c as i64 * step.value;
            state.remaining[g] -= c;
            state.penalty += model.level_cell_penalty(step.level, c);
        }

        if self.tick() {
            return;
        }
        self.visit_next(0, groups - 1, &mut state);
    }

    /// Counts a node; returns true if the search must stop.
    fn tick(&self) -> bool {
        let progress = self.search.progress;
        if progress.is_stopped() {
            return true;
        }
        let nodes = progress.record_node();
        if nodes % CHECK_INTERVAL == 0 && self.search.termination.is_terminated(progress) {
            progress.stop();
            return true;
        }
        false
    }

    fn descend(&mut self, k: usize, g: usize, state: &mut State) {
        let model = self.search.model;
        let step = self.plan.steps[k];
        let left = state.level_left;

        for c in self.plan.candidates(model, k, g, left) {
            if c > state.remaining[g] {
                continue;
            }
            let new_remaining = state.remaining[g] - c;
            if new_remaining < self.plan.future_min[k] || new_remaining > self.plan.future_max[k]
            {
                continue;
            }
            if self.tick() {
                return;
            }

            let cell_penalty = model.level_cell_penalty(step.level, c);
            state.cells[k][g] = c;
            state.sums[g] += c as i64 * step.value;
            state.remaining[g] = new_remaining;
            state.level_left = left - c;
            state.penalty += cell_penalty;

            self.visit_next(k, g, state);

            state.penalty -= cell_penalty;
            state.level_left = left;
            state.remaining[g] += c;
            state.sums[g] -= c as i64 * step.value;
            state.cells[k][g] = 0;

            if self.search.progress.is_stopped() {
                return;
            }
        }
    }

    /// Moves past the just-decided cell `(k, g)`: next cell, next level, or leaf.
    fn visit_next(&mut self, k: usize, g: usize, state: &mut State) {
        let groups = self.plan.groups;
        let levels = self.plan.steps.len();

        if g + 1 == groups && k + 1 == levels {
            let objective = self.search.bounder.exact(&state.sums, state.penalty);
            self.offer(objective, state);
            return;
        }

        if self.is_prunable(k, g, state) {
            return;
        }

        if g + 1 < groups {
            self.descend(k, g + 1, state);
        } else {
            let saved = state.level_left;
            state.level_left = self.plan.steps[k + 1].total;
            self.descend(k + 1, 0, state);
            state.level_left = saved;
        }
    }

    fn is_prunable(&mut self, k: usize, g: usize, state: &State) -> bool {
        let bound = self.lower_bound(k, g, state);
        if let Some(best) = &self.best {
            if bound >= best.objective {
                return true;
            }
        }
        bound > self.search.incumbent.load(Ordering::Relaxed)
    }

    /// Optimistic objective of any completion after deciding cell `(k, g)`.
    fn lower_bound(&mut self, k: usize, g: usize, state: &State) -> i64 {
        let steps = &self.plan.steps;
        let current = steps[k].value;
        let next = steps.get(k + 1).map(|s| s.value);

        self.ranges.clear();
        for h in 0..self.plan.groups {
            let remaining = state.remaining[h] as i64;
            let lightest = if h > g && state.level_left > 0 {
                current
            } else {
                next.unwrap_or(current)
            };
            let sum = state.sums[h];
            self.ranges.push((
                sum + remaining * lightest,
                sum + remaining * self.plan.weakest_value,
            ));
        }
        let floor = state.penalty + self.plan.future_penalty[k];
        self.search.bounder.lower_bound(&self.ranges, floor)
    }

    fn offer(&mut self, objective: i64, state: &State) {
        let improves = self
            .best
            .as_ref()
            .map_or(true, |best| objective < best.objective);
        if !improves {
            return;
        }
        trace!(event = "incumbent", objective = objective);
        self.best = Some(Incumbent {
            objective,
            counts: state.cells.clone(),
        });
        self.search.incumbent.fetch_min(objective, Ordering::Relaxed);
    }
}
