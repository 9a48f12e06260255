use std::cmp::max;
use std::collections::HashSet;
use std::ptr;

use ahash::RandomState;

use crate::models::{IntType, ProblemData};
use crate::solver::improvement::moves::Moves;
use crate::solver::improvement::{link_nodes, Node, Route};
use crate::solver::{Context, Individual, PenaltyManager};

/// Iterates (customer, neighbour) pairs from the granular neighbourhood and
/// applies any strictly improving registered move until none is left.
pub struct LocalSearch {
    pub ctx: &'static Context,

    pub routes: Vec<Route>,
    pub customers: Vec<usize>,

    // For every client, the closest other clients by distance
    pub correlations: Vec<Vec<usize>>,

    pub move_count: IntType,
    pub moves: Moves,

    // Nodes used in the local search
    pub nodes: Vec<Node>,
    pub start_depots: Vec<Node>,
    pub end_depots: Vec<Node>,

    // Indices of empty routes
    pub empty_routes: HashSet<usize, RandomState>,

    // Penalties in effect during the search
    pub penalty: PenaltyManager,
}

impl LocalSearch {
    pub fn new(ctx: &Context) -> Self {
        let problem = &ctx.problem;
        let num_vehicles = problem.num_vehicles;

        let nodes: Vec<Node> = (0..problem.dim())
            .map(|client| Node::new(client, problem))
            .collect();
        let customers: Vec<usize> = (1..problem.dim()).collect();

        // Create the depot sentinels up front so their addresses are stable
        // when the routes take pointers to them.
        let mut start_depots: Vec<Node> =
            (0..num_vehicles).map(|_| Node::new(0, problem)).collect();
        let mut end_depots: Vec<Node> = (0..num_vehicles).map(|_| Node::new(0, problem)).collect();

        let routes = (0..num_vehicles)
            .map(|index| {
                let start_depot = &mut start_depots[index] as *mut Node;
                let end_depot = &mut end_depots[index] as *mut Node;
                Route::new(index, start_depot, end_depot)
            })
            .collect();

        let granularity = ctx.config.borrow().granularity as usize;

        Self {
            ctx: unsafe { &*(ctx as *const Context) },
            routes,
            customers,
            correlations: Self::build_correlations(problem, granularity),
            move_count: 0,
            moves: Moves::new(ctx),
            nodes,
            start_depots,
            end_depots,
            empty_routes: HashSet::with_capacity_and_hasher(
                num_vehicles,
                ctx.random.random_state(),
            ),
            penalty: PenaltyManager::from_config(&ctx.config.borrow(), problem.vehicle_capacity),
        }
    }

    // The granular neighbourhood: for every client, its `granularity`
    // spatially nearest other clients.
    fn build_correlations(problem: &ProblemData, granularity: usize) -> Vec<Vec<usize>> {
        let mut correlations = vec![Vec::new(); problem.dim()];
        for client in 1..problem.dim() {
            let mut others: Vec<usize> = (1..problem.dim())
                .filter(|&other| other != client)
                .collect();
            others.sort_by_key(|&other| problem.dist(client, other));
            others.truncate(granularity);
            correlations[client] = others;
        }
        correlations
    }

    pub fn update_penalty(&mut self, penalty: &PenaltyManager) {
        self.penalty = penalty.clone();
    }

    pub fn load_individual(&mut self, individual: &Individual) {
        unsafe {
            for route_index in 0..self.routes.len() {
                // Start with the depot as the last node
                let mut last_node = &mut self.start_depots[route_index] as *mut Node;

                // Link up all nodes
                for &client in individual.routes[route_index].iter() {
                    let node = &mut self.nodes[client] as *mut Node;
                    link_nodes(last_node, node);
                    last_node = node;
                }

                // Link the last node to the end depot
                let depot_end = &mut self.end_depots[route_index] as *mut Node;
                link_nodes(last_node, depot_end);

                let route = &mut self.routes[route_index] as *mut Route;
                self.update_route(route);
            }
        }
    }

    pub fn reset(&mut self) {
        self.move_count = 0;
        for node in self.nodes.iter_mut() {
            node.last_tested = -1;
        }
    }

    /// Improve the individual in place under the given penalties.
    pub fn run(&mut self, individual: &mut Individual, penalty: &PenaltyManager) {
        self.reset();
        self.update_penalty(penalty);
        self.load_individual(individual);
        unsafe {
            self.search();
        }
        self.update_individual(individual);
    }

    unsafe fn search(&mut self) {
        let mut loop_count = 0;
        let mut improvement = true;
        let moves = &*(&self.moves as *const Moves);

        while improvement {
            improvement = false;

            // Loop over all customers in random order
            self.ctx.random.shuffle(self.customers.as_mut_slice());
            let customers = &*(&self.customers as *const Vec<usize>);

            for &u_index in customers.iter() {
                let cor = &mut *(self.correlations.get_unchecked_mut(u_index) as *mut Vec<usize>);
                if !cor.is_empty() && self.ctx.random.range_usize(0, cor.len()) == 0 {
                    self.ctx.random.shuffle(cor.as_mut_slice());
                }

                let u = &mut self.nodes[u_index] as *mut Node;
                let mut route_u = (*u).route;

                let last_test_u = (*u).last_tested;
                (*u).last_tested = self.move_count;

                // Iterate over correlated nodes
                'v_loop: for &v_index in cor.iter() {
                    let v = &mut self.nodes[v_index] as *mut Node;
                    let route_v = (*v).route;

                    // Only try moves if one of the routes changed since the
                    // pair was last tested
                    if loop_count == 0
                        || max((*route_u).last_modified, (*route_v).last_modified) > last_test_u
                    {
                        for m in moves.node.iter() {
                            let delta = m.evaluate(self, u, v);
                            if delta < 0 {
                                self.move_count += 1;
                                log::debug!("{}: delta {}", m.name(), delta);
                                m.apply(self, u, v);
                                route_u = (*u).route;
                                improvement = true;
                                continue 'v_loop;
                            }
                        }

                        // Also test insertion right after V's start depot
                        let v_pred = (*v).predecessor;
                        if (*v_pred).is_depot() {
                            for m in moves.node.iter() {
                                let delta = m.evaluate(self, u, v_pred);
                                if delta < 0 {
                                    self.move_count += 1;
                                    log::debug!("{}: delta {}", m.name(), delta);
                                    m.apply(self, u, v_pred);
                                    route_u = (*u).route;
                                    improvement = true;
                                    continue 'v_loop;
                                }
                            }
                        }
                    }
                }

                if loop_count > 0 && !self.empty_routes.is_empty() {
                    let empty_route_index =
                        *self.empty_routes.iter().next().expect("No empty route");
                    let route_v = &mut self.routes[empty_route_index] as *mut Route;
                    let v = (*route_v).start_depot;
                    for m in moves.node.iter() {
                        let delta = m.evaluate(self, u, v);
                        if delta < 0 {
                            self.move_count += 1;
                            log::debug!("{}: delta {}", m.name(), delta);
                            m.apply(self, u, v);
                            improvement = true;
                            break;
                        }
                    }
                }
            }
            loop_count += 1;
        }
    }

    pub fn update_individual(&self, individual: &mut Individual) {
        unsafe {
            for (route_number, route) in self.routes.iter().enumerate() {
                let mut clients: Vec<usize> = Vec::with_capacity(route.num_customers);
                let mut next_node = route.start_depot;
                while !next_node.is_null() {
                    let node = &*next_node;
                    if !node.is_depot() {
                        clients.push(node.client);
                    }
                    next_node = node.successor;
                }
                individual.routes[route_number] = clients;
            }
        }

        individual.sort_empty_routes_last();
        individual.evaluate(self.ctx, &self.penalty);
    }

    // Used to refresh a route after a move is performed
    pub unsafe fn update_route(&mut self, route_ptr: *mut Route) {
        (*route_ptr).update(&self.ctx.problem);
        (*route_ptr).last_modified = self.move_count;

        if (*route_ptr).is_empty() {
            self.empty_routes.insert((*route_ptr).index);
        } else {
            self.empty_routes.remove(&(*route_ptr).index);
        }
    }
}

impl Drop for LocalSearch {
    fn drop(&mut self) {
        for node in self.nodes.iter_mut() {
            node.route = ptr::null_mut();
            node.predecessor = ptr::null_mut();
            node.successor = ptr::null_mut();
        }
        for node in self.start_depots.iter_mut() {
            node.route = ptr::null_mut();
            node.predecessor = ptr::null_mut();
            node.successor = ptr::null_mut();
        }
        for node in self.end_depots.iter_mut() {
            node.route = ptr::null_mut();
            node.predecessor = ptr::null_mut();
            node.successor = ptr::null_mut();
        }
    }
}
