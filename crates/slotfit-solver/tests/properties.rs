// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Properties checked on seeded random instances.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotfit_fit::{
    exhaustive::ExhaustiveSearch, greedy::BestFitGreedy, parallel::ParallelExhaustiveSearch,
};
use slotfit_model::problem::{Problem, ProblemBuilder};
use slotfit_search::{
    result::{SchedulerOutcome, SchedulerResult},
    strategy::SchedulingStrategy,
};
use slotfit_solver::scheduler::SchedulerBuilder;

type IntegerType = i64;

const SEEDS: u64 = 60;

struct Instance {
    durations: Vec<IntegerType>,
    busy: Vec<(IntegerType, IntegerType)>,
    left: IntegerType,
    right: IntegerType,
}

impl Instance {
    fn random(rng: &mut ChaCha8Rng) -> Self {
        let left = rng.random_range(-50..=50);
        let right = left + rng.random_range(0..=200);
        let num_busy = rng.random_range(0..=5);
        let busy = (0..num_busy)
            .map(|_| {
                // Busy time may stick out of the window on either side.
                let start = rng.random_range(left - 20..=right + 20);
                (start, start + rng.random_range(0..=40))
            })
            .collect();
        let num_tasks = rng.random_range(0..=6);
        let durations = (0..num_tasks).map(|_| rng.random_range(1..=60)).collect();
        Self {
            durations,
            busy,
            left,
            right,
        }
    }

    fn problem(&self) -> Problem<IntegerType> {
        let mut builder = ProblemBuilder::new(self.left, self.right);
        builder
            .add_tasks(self.durations.iter().copied())
            .add_busy_intervals(self.busy.iter().copied());
        builder
            .build()
            .unwrap_or_else(|e| panic!("generated an invalid instance: {e}"))
    }
}

fn instances() -> impl Iterator<Item = Instance> {
    (0..SEEDS).map(|seed| Instance::random(&mut ChaCha8Rng::seed_from_u64(seed)))
}

fn solve<S>(strategy: S, problem: &Problem<IntegerType>) -> SchedulerOutcome<IntegerType>
where
    S: SchedulingStrategy<IntegerType>,
{
    SchedulerBuilder::new()
        .with_strategy(strategy)
        .build()
        .schedule(problem)
        .unwrap_or_else(|e| panic!("schedule failed: {e}"))
}

fn placed(outcome: &SchedulerOutcome<IntegerType>) -> usize {
    outcome.placement().map_or(0, |p| p.len())
}

#[test]
fn test_placements_satisfy_all_invariants() {
    for instance in instances() {
        let problem = instance.problem();
        for outcome in [
            solve(ExhaustiveSearch::new(), &problem),
            solve(ParallelExhaustiveSearch::new().with_num_threads(2), &problem),
            solve(BestFitGreedy, &problem),
        ] {
            if let Some(placement) = outcome.placement() {
                placement
                    .verify(&problem)
                    .unwrap_or_else(|v| panic!("{problem}: {v}"));
            }
            assert!(!outcome.is_aborted());
        }
    }
}

#[test]
fn test_search_is_deterministic() {
    for instance in instances() {
        let problem = instance.problem();
        let first = solve(ExhaustiveSearch::new(), &problem);
        let second = solve(ExhaustiveSearch::new(), &problem);
        assert_eq!(first.result, second.result, "{problem}");
    }
}

#[test]
fn test_parallel_matches_sequential_exactly() {
    for instance in instances() {
        let problem = instance.problem();
        let sequential = solve(ExhaustiveSearch::new().with_prune_dominated(false), &problem);
        for threads in [1, 3] {
            let parallel = solve(
                ParallelExhaustiveSearch::new().with_num_threads(threads),
                &problem,
            );
            assert_eq!(parallel.result, sequential.result, "{problem}");
        }
    }
}

#[test]
fn test_pruning_does_not_change_result() {
    for instance in instances() {
        let problem = instance.problem();
        let pruned = solve(ExhaustiveSearch::new(), &problem);
        let full = solve(ExhaustiveSearch::new().with_prune_dominated(false), &problem);
        assert_eq!(pruned.result, full.result, "{problem}");
    }
}

#[test]
fn test_more_busy_time_never_places_more() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xB05F);
    for mut instance in instances() {
        let before = placed(&solve(ExhaustiveSearch::new(), &instance.problem()));

        let start = rng.random_range(instance.left..=instance.right);
        instance.busy.push((start, start + rng.random_range(0..=30)));
        let after = placed(&solve(ExhaustiveSearch::new(), &instance.problem()));

        assert!(after <= before, "adding busy time placed {after} > {before}");
    }
}

#[test]
fn test_greedy_never_beats_exhaustive() {
    for instance in instances() {
        let problem = instance.problem();
        let exact = solve(ExhaustiveSearch::new(), &problem);
        let greedy = solve(BestFitGreedy, &problem);
        assert!(placed(&greedy) <= placed(&exact), "{problem}");
        if exact.result == SchedulerResult::NoFit {
            assert_eq!(greedy.result, SchedulerResult::NoFit);
        }
    }
}

#[test]
fn test_known_full_placement_is_found() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..SEEDS {
        // Lay tasks end to end with busy separators, then shuffle them.
        let num_tasks = rng.random_range(1..=6);
        let mut durations = Vec::with_capacity(num_tasks);
        let mut busy = Vec::new();
        let mut cursor: IntegerType = 0;
        for _ in 0..num_tasks {
            let duration = rng.random_range(1..=30);
            durations.push(duration);
            cursor += duration;
            if rng.random_bool(0.5) {
                let gap = rng.random_range(1..=10);
                busy.push((cursor, cursor + gap - 1));
                cursor += gap;
            }
        }
        for i in (1..durations.len()).rev() {
            let j = rng.random_range(0..=i);
            durations.swap(i, j);
        }

        let problem = Problem::new(&durations, &busy, 0, cursor.max(1) - 1).unwrap();
        let outcome = solve(ExhaustiveSearch::new(), &problem);
        assert!(outcome.is_maximal(), "{problem}");
        assert_eq!(placed(&outcome), num_tasks, "{problem}");
    }
}
