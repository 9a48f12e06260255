use anyhow::{anyhow, Result};

use crate::models::IntType;
use crate::solver::{Context, PenaltyManager, SolutionEvaluation};

/// A complete candidate solution: one route per vehicle, possibly empty,
/// with non-empty routes occupying the lower indices.
#[derive(Debug, Clone)]
pub struct Individual {
    // Solution representation split into routes. The depot is not listed.
    pub routes: Vec<Vec<usize>>,
    // Evaluation of the solution
    pub evaluation: SolutionEvaluation,
}

impl Individual {
    /// Build an individual from explicit routes. Fails when fewer route
    /// lists than vehicles are supplied, when lists beyond the vehicle count
    /// are non-empty, or when a client index is out of range.
    pub fn new(ctx: &Context, penalty: &PenaltyManager, routes: Vec<Vec<usize>>) -> Result<Self> {
        let num_vehicles = ctx.problem.num_vehicles;

        if routes.len() < num_vehicles {
            return Err(anyhow!(
                "invalid routes: got {} route lists for {} vehicles",
                routes.len(),
                num_vehicles
            ));
        }

        if routes.iter().skip(num_vehicles).any(|route| !route.is_empty()) {
            return Err(anyhow!(
                "invalid routes: more than {} non-empty routes",
                num_vehicles
            ));
        }

        for &client in routes.iter().flatten() {
            if client == 0 || client >= ctx.problem.dim() {
                return Err(anyhow!("invalid routes: client {} out of range", client));
            }
        }

        let mut routes = routes;
        routes.truncate(num_vehicles);

        let mut individual = Self {
            routes,
            evaluation: SolutionEvaluation::new(),
        };
        individual.sort_empty_routes_last();
        individual.evaluate(ctx, penalty);
        Ok(individual)
    }

    /// Move empty routes to the back, keeping the relative order of the
    /// non-empty routes.
    pub fn sort_empty_routes_last(&mut self) {
        self.routes.sort_by_key(|route| route.is_empty());
    }

    pub fn evaluate(&mut self, ctx: &Context, penalty: &PenaltyManager) {
        self.evaluation.evaluate(&ctx.problem, penalty, &self.routes);
    }

    pub fn get_routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Number of non-empty routes.
    pub fn num_routes(&self) -> usize {
        self.routes.iter().filter(|route| !route.is_empty()).count()
    }

    /// For every client, the pair of clients served directly before and
    /// after it; `(0, 0)` for the depot entry.
    pub fn get_neighbours(&self) -> Vec<(usize, usize)> {
        self.evaluation
            .predecessors
            .iter()
            .zip(self.evaluation.successors.iter())
            .map(|(&pred, &succ)| (pred, succ))
            .collect()
    }

    pub fn is_feasible(&self) -> bool {
        self.evaluation.is_feasible()
    }

    pub fn has_excess_capacity(&self) -> bool {
        self.evaluation.excess_load > 0
    }

    pub fn has_time_warp(&self) -> bool {
        self.evaluation.time_warp > 0
    }

    pub fn cost(&self) -> IntType {
        self.evaluation.penalized_cost
    }

    #[inline]
    pub fn successor(&self, client: usize) -> usize {
        self.evaluation.successors[client]
    }

    #[inline]
    pub fn predecessor(&self, client: usize) -> usize {
        self.evaluation.predecessors[client]
    }

    /// Number of undirected client adjacencies of `self` that do not appear
    /// in `other`. Zero iff the two solutions share all adjacencies.
    pub fn broken_pairs_distance(&self, other: &Self) -> IntType {
        let mut distance = 0;

        for client in 1..self.evaluation.successors.len() {
            let succ = self.successor(client);
            let pred = self.predecessor(client);
            let other_succ = other.successor(client);
            let other_pred = other.predecessor(client);

            // The adjacency (client, succ) is broken if the other solution
            // links client to succ in neither direction.
            if succ != other_succ && succ != other_pred {
                distance += 1;
            }

            // The adjacency (depot, client) at the head of a route. A
            // single-client route is already covered by the successor check.
            if pred == 0 && succ != 0 && other_pred != 0 && other_succ != 0 {
                distance += 1;
            }
        }

        distance
    }
}
