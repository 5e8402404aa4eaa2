//! NSGA-II on continuous design spaces.
//!
//! Deb et al. (2002): binary tournament on (rank, crowding distance), SBX
//! crossover, polynomial mutation and elitist environmental selection over
//! the union of parents and offspring.

use super::operators::{polynomial_mutation, sbx_crossover, tournament_select};
use super::{GeneticSolver, MultiObjectiveProblem, ParetoSet};
use crate::error::{Error, Result};
use crate::pareto;
use crate::rng_util;
use crate::types::{Bounds, DesignPoint};

/// NSGA-II genetic solver.
///
/// - `crossover_prob`: 0.9
/// - `crossover_eta`: 20.0
/// - `mutation_eta`: 20.0
///
/// # Examples
///
/// ```
/// use egomoo::Bounds;
/// use egomoo::genetic::{GeneticSolver, MultiObjectiveProblem, Nsga2};
///
/// struct Schaffer;
///
/// impl MultiObjectiveProblem for Schaffer {
///     fn n_obj(&self) -> usize {
///         2
///     }
///     fn evaluate(&self, x: &[f64]) -> Vec<f64> {
///         vec![x[0] * x[0], (x[0] - 2.0).powi(2)]
///     }
/// }
///
/// let bounds = Bounds::new(vec![(-5.0, 5.0)]).unwrap();
/// let set = Nsga2::new().solve(&Schaffer, &bounds, 40, 30, 42).unwrap();
/// assert!(!set.is_empty());
/// assert!(set.x.iter().all(|x| (-0.1..=2.1).contains(&x[0])));
/// ```
#[derive(Clone, Debug)]
pub struct Nsga2 {
    crossover_prob: f64,
    crossover_eta: f64,
    mutation_eta: f64,
}

impl Nsga2 {
    /// Creates a solver with default operator settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            crossover_prob: 0.9,
            crossover_eta: 20.0,
            mutation_eta: 20.0,
        }
    }

    /// Sets the crossover probability. Default: 0.9.
    #[must_use]
    pub fn crossover_prob(mut self, prob: f64) -> Self {
        self.crossover_prob = prob;
        self
    }

    /// Sets the SBX distribution index. Default: 20.0.
    #[must_use]
    pub fn crossover_eta(mut self, eta: f64) -> Self {
        self.crossover_eta = eta;
        self
    }

    /// Sets the polynomial mutation distribution index. Default: 20.0.
    #[must_use]
    pub fn mutation_eta(mut self, eta: f64) -> Self {
        self.mutation_eta = eta;
        self
    }

    fn offspring(
        &self,
        rng: &mut fastrand::Rng,
        population: &[DesignPoint],
        values: &[Vec<f64>],
        bounds: &Bounds,
    ) -> Vec<DesignPoint> {
        let pop_size = population.len();
        let (ranks, crowding) = rank_and_crowding(values);

        let mut children = Vec::with_capacity(pop_size);
        while children.len() < pop_size {
            let p1 = tournament_select(rng, &ranks, &crowding);
            let p2 = tournament_select(rng, &ranks, &crowding);

            let (mut c1, mut c2) = sbx_crossover(
                rng,
                &population[p1],
                &population[p2],
                bounds,
                self.crossover_prob,
                self.crossover_eta,
            );
            polynomial_mutation(rng, &mut c1, bounds, self.mutation_eta);
            polynomial_mutation(rng, &mut c2, bounds, self.mutation_eta);

            children.push(c1);
            if children.len() < pop_size {
                children.push(c2);
            }
        }
        children
    }
}

impl Default for Nsga2 {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneticSolver for Nsga2 {
    fn solve(
        &self,
        problem: &dyn MultiObjectiveProblem,
        bounds: &Bounds,
        pop_size: usize,
        n_gen: usize,
        seed: u64,
    ) -> Result<ParetoSet> {
        if pop_size == 0 {
            return Err(Error::InvalidPopulationSize(pop_size));
        }
        let mut rng = fastrand::Rng::with_seed(seed);

        let mut population: Vec<DesignPoint> = (0..pop_size)
            .map(|_| rng_util::uniform_point(&mut rng, bounds))
            .collect();
        let mut values: Vec<Vec<f64>> = population.iter().map(|x| problem.evaluate(x)).collect();

        for _generation in 0..n_gen {
            let children = self.offspring(&mut rng, &population, &values, bounds);
            let child_values: Vec<Vec<f64>> =
                children.iter().map(|x| problem.evaluate(x)).collect();

            population.extend(children);
            values.extend(child_values);

            let survivors = environmental_selection(&values, pop_size);
            population = survivors.iter().map(|&i| population[i].clone()).collect();
            values = survivors.iter().map(|&i| values[i].clone()).collect();
        }

        let front = pareto::pareto_front_indices(&values);
        trace_debug!(n_gen, pop_size, front_size = front.len(), "NSGA-II finished");
        Ok(ParetoSet {
            x: front.iter().map(|&i| population[i].clone()).collect(),
            f: front.iter().map(|&i| values[i].clone()).collect(),
        })
    }
}

/// Non-domination rank and crowding distance of every individual.
fn rank_and_crowding(values: &[Vec<f64>]) -> (Vec<usize>, Vec<f64>) {
    let n = values.len();
    let mut rank = vec![0_usize; n];
    let mut crowding = vec![0.0_f64; n];

    for (front_rank, front) in pareto::non_dominated_sort(values).iter().enumerate() {
        let cd = pareto::crowding_distance_indexed(front, values);
        for (i, &idx) in front.iter().enumerate() {
            rank[idx] = front_rank;
            crowding[idx] = cd[i];
        }
    }
    (rank, crowding)
}

/// Picks `pop_size` survivors: whole fronts in rank order, the last partial
/// front truncated by decreasing crowding distance.
fn environmental_selection(values: &[Vec<f64>], pop_size: usize) -> Vec<usize> {
    let mut selected = Vec::with_capacity(pop_size);
    for front in pareto::non_dominated_sort(values) {
        if selected.len() + front.len() <= pop_size {
            selected.extend_from_slice(&front);
            continue;
        }
        let remaining = pop_size - selected.len();
        let cd = pareto::crowding_distance_indexed(&front, values);
        let mut order: Vec<usize> = (0..front.len()).collect();
        order.sort_by(|&a, &b| cd[b].total_cmp(&cd[a]));
        selected.extend(order[..remaining].iter().map(|&k| front[k]));
        break;
    }
    selected
}
