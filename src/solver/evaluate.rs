use crate::models::{IntType, ProblemData};
use crate::solver::PenaltyManager;

#[derive(Debug, Clone)]
pub struct RouteEvaluation {
    pub distance: IntType,
    pub load: IntType,
    pub excess_load: IntType,
    pub time_warp: IntType,
}

impl RouteEvaluation {
    pub fn empty() -> Self {
        Self {
            distance: 0,
            load: 0,
            excess_load: 0,
            time_warp: 0,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.excess_load == 0 && self.time_warp == 0
    }
}

#[derive(Debug, Clone)]
pub struct SolutionEvaluation {
    // Penalized cost of the solution
    pub penalized_cost: IntType,
    pub distance: IntType,
    pub excess_load: IntType,
    pub time_warp: IntType,

    // Evaluation of routes
    pub routes: Vec<RouteEvaluation>,

    // For every client in the solution, the client served directly before
    // and after it; the depot (0) at route ends.
    pub predecessors: Vec<usize>,
    pub successors: Vec<usize>,
}

impl SolutionEvaluation {
    pub fn new() -> Self {
        Self {
            penalized_cost: IntType::MAX,
            distance: 0,
            excess_load: 0,
            time_warp: 0,
            routes: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.excess_load == 0 && self.time_warp == 0
    }

    fn reset(&mut self, num_routes: usize, num_nodes: usize) {
        self.routes.clear();
        self.routes.resize(num_routes, RouteEvaluation::empty());
        self.predecessors.clear();
        self.predecessors.resize(num_nodes, 0);
        self.successors.clear();
        self.successors.resize(num_nodes, 0);
    }

    pub fn evaluate(
        &mut self,
        problem: &ProblemData,
        penalty: &PenaltyManager,
        solution: &[Vec<usize>],
    ) {
        self.reset(solution.len(), problem.dim());

        let depot = 0;
        let mut total_distance = 0;
        let mut total_excess_load = 0;
        let mut total_time_warp = 0;
        let mut load_penalties = 0;

        for (route_index, route) in solution.iter().enumerate() {
            let mut last_node = depot;
            let mut load = 0;
            let mut route_distance = 0;

            // Vehicles leave the depot at the opening of its window; arriving
            // early means waiting, arriving late means warping back to the
            // closing time.
            let mut time = problem.client(depot).tw.earliest;
            let mut time_warp = 0;

            for &node in route.iter() {
                route_distance += problem.dist(last_node, node);
                load += problem.client(node).demand;

                let client = problem.client(node);
                time += problem.dist(last_node, node);
                if time < client.tw.earliest {
                    time = client.tw.earliest;
                }
                if time > client.tw.latest {
                    time_warp += time - client.tw.latest;
                    time = client.tw.latest;
                }
                time += client.service_duration;

                self.predecessors[node] = last_node;
                self.successors[last_node] = node;

                last_node = node;
            }
            self.successors[last_node] = depot;

            route_distance += problem.dist(last_node, depot);
            time += problem.dist(last_node, depot);
            if time > problem.client(depot).tw.latest {
                time_warp += time - problem.client(depot).tw.latest;
            }

            let excess_load = (load - penalty.vehicle_capacity).max(0);

            let entry = &mut self.routes[route_index];
            entry.distance = route_distance;
            entry.load = load;
            entry.excess_load = excess_load;
            entry.time_warp = time_warp;

            total_distance += route_distance;
            total_excess_load += excess_load;
            total_time_warp += time_warp;
            load_penalties += penalty.load_penalty(load);
        }

        // The depot has no neighbours of its own.
        self.predecessors[depot] = 0;
        self.successors[depot] = 0;

        self.distance = total_distance;
        self.excess_load = total_excess_load;
        self.time_warp = total_time_warp;
        self.penalized_cost = total_distance + load_penalties + penalty.tw_penalty(total_time_warp);
    }
}
