use std::fmt;
use std::ptr;

use crate::models::{IntType, ProblemData, TimeWindowSegment};

#[inline]
pub unsafe fn link_nodes(node_one: *mut Node, node_two: *mut Node) {
    (*node_one).successor = node_two;
    (*node_two).predecessor = node_one;
}

/// Unlink `node` from its route. The node keeps its own field values until
/// the next route update.
#[inline]
pub unsafe fn remove_node(node: *mut Node) {
    link_nodes((*node).predecessor, (*node).successor);
}

/// Remove `node` from its current position and insert it directly after
/// `after`. Cached attributes of the affected routes are stale until their
/// next `update`.
#[inline]
pub unsafe fn insert_node(node: *mut Node, after: *mut Node) {
    remove_node(node);
    let after_next = (*after).successor;
    link_nodes(after, node);
    link_nodes(node, after_next);
    (*node).route = (*after).route;
}

/// Exchange the positions of two distinct non-depot nodes, possibly in
/// different routes and possibly adjacent. Swaps the `route` and `position`
/// fields along with the links.
pub unsafe fn swap_nodes(u: *mut Node, v: *mut Node) {
    if (*u).successor == v {
        let u_prev = (*u).predecessor;
        let v_next = (*v).successor;
        link_nodes(u_prev, v);
        link_nodes(v, u);
        link_nodes(u, v_next);
    } else if (*v).successor == u {
        let v_prev = (*v).predecessor;
        let u_next = (*u).successor;
        link_nodes(v_prev, u);
        link_nodes(u, v);
        link_nodes(v, u_next);
    } else {
        let u_prev = (*u).predecessor;
        let u_next = (*u).successor;
        let v_prev = (*v).predecessor;
        let v_next = (*v).successor;
        link_nodes(u_prev, v);
        link_nodes(v, u_next);
        link_nodes(v_prev, u);
        link_nodes(u, v_next);
    }

    let route_u = (*u).route;
    (*u).route = (*v).route;
    (*v).route = route_u;

    let position_u = (*u).position;
    (*u).position = (*v).position;
    (*v).position = position_u;
}

#[derive(Clone, Debug)]
pub struct Node {
    pub client: usize,
    pub successor: *mut Node,
    pub predecessor: *mut Node,
    pub route: *mut Route,
    // 1-based index in the route; 0 for the start depot sentinel
    pub position: usize,
    pub last_tested: IntType,
    pub cum_distance: IntType,
    pub cum_load: IntType,
    // Summaries of [this], [depot..this] and [this..depot]
    pub tw: TimeWindowSegment,
    pub tw_before: TimeWindowSegment,
    pub tw_after: TimeWindowSegment,
}

impl Node {
    pub fn new(client: usize, problem: &ProblemData) -> Self {
        let tw = TimeWindowSegment::from_client(problem, client);
        Self {
            client,
            successor: ptr::null_mut(),
            predecessor: ptr::null_mut(),
            route: ptr::null_mut(),
            position: 0,
            last_tested: 0,
            cum_distance: 0,
            cum_load: 0,
            tw,
            tw_before: tw,
            tw_after: tw,
        }
    }

    pub fn is_depot(&self) -> bool {
        self.client == 0
    }
}

#[derive(Clone, Debug)]
pub struct Route {
    pub index: usize,

    // Reference to the depot sentinels
    pub start_depot: *mut Node,
    pub end_depot: *mut Node,

    // Client nodes in visit order, then the end depot; rebuilt on update so
    // positions are addressable in constant time
    pub nodes: Vec<*mut Node>,

    // Number of customers visited in the route
    pub num_customers: usize,

    // Used to keep track of changes
    pub last_modified: IntType,

    pub distance: IntType,
    pub load: IntType,
    pub overload: IntType,
    pub time_warp: IntType,
}

impl Route {
    pub fn new(index: usize, start_depot: *mut Node, end_depot: *mut Node) -> Self {
        Self {
            index,
            start_depot,
            end_depot,
            nodes: Vec::new(),
            num_customers: 0,
            last_modified: 0,
            distance: IntType::MAX,
            load: IntType::MAX,
            overload: IntType::MAX,
            time_warp: IntType::MAX,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_customers == 0
    }

    /// Number of client nodes, sentinels excluded.
    pub fn size(&self) -> usize {
        self.num_customers
    }

    pub fn has_excess_load(&self) -> bool {
        self.overload > 0
    }

    pub fn has_time_warp(&self) -> bool {
        self.time_warp > 0
    }

    pub fn is_feasible(&self) -> bool {
        !self.has_excess_load() && !self.has_time_warp()
    }

    /// Node at the given position: 0 is the start depot, `size() + 1` the
    /// end depot.
    #[inline]
    pub fn node_at(&self, position: usize) -> *mut Node {
        if position == 0 {
            self.start_depot
        } else {
            self.nodes[position - 1]
        }
    }

    /// Distance travelled from the node at `start` to the node at `end`.
    #[inline]
    pub unsafe fn dist_between(&self, start: usize, end: usize) -> IntType {
        (*self.node_at(end)).cum_distance - (*self.node_at(start)).cum_distance
    }

    /// Total demand on positions `start..=end`; `start` must be at least 1.
    #[inline]
    pub unsafe fn load_between(&self, start: usize, end: usize) -> IntType {
        (*self.node_at(end)).cum_load - (*self.node_at(start - 1)).cum_load
    }

    /// Time window summary of positions `start..=end`.
    pub unsafe fn tw_between(
        &self,
        start: usize,
        end: usize,
        problem: &ProblemData,
    ) -> TimeWindowSegment {
        let mut tws = (*self.node_at(start)).tw;
        for position in start + 1..=end {
            tws = tws.merge((*self.node_at(position)).tw, problem);
        }
        tws
    }

    /// Re-establish every cached attribute of the route and its nodes from
    /// the link structure.
    pub unsafe fn update(&mut self, problem: &ProblemData) {
        let mut distance = 0;
        let mut load = 0;
        let mut num_customers = 0;

        self.nodes.clear();
        (*self.start_depot).predecessor = ptr::null_mut();
        (*self.end_depot).successor = ptr::null_mut();

        let route_ptr = self as *mut Route;
        let mut last_node_ptr = self.start_depot;
        (*last_node_ptr).route = route_ptr;
        (*last_node_ptr).position = 0;
        (*last_node_ptr).cum_distance = 0;
        (*last_node_ptr).cum_load = 0;
        (*last_node_ptr).tw_before = (*last_node_ptr).tw;

        let mut node_ptr = (*last_node_ptr).successor;
        let mut position = 1;

        while !node_ptr.is_null() {
            distance += problem.dist((*last_node_ptr).client, (*node_ptr).client);
            load += problem.client((*node_ptr).client).demand;

            if !(*node_ptr).is_depot() {
                num_customers += 1;
            }
            (*node_ptr).cum_distance = distance;
            (*node_ptr).cum_load = load;
            (*node_ptr).route = route_ptr;
            (*node_ptr).position = position;
            (*node_ptr).tw_before = (*last_node_ptr).tw_before.merge((*node_ptr).tw, problem);
            self.nodes.push(node_ptr);
            position += 1;
            last_node_ptr = node_ptr;
            node_ptr = (*node_ptr).successor;
        }

        // last_node_ptr is now the end depot; walk back to fill the
        // suffix summaries.
        (*last_node_ptr).tw_after = (*last_node_ptr).tw;
        let mut node_ptr = (*last_node_ptr).predecessor;
        while !node_ptr.is_null() {
            (*node_ptr).tw_after = (*node_ptr)
                .tw
                .merge((*(*node_ptr).successor).tw_after, problem);
            node_ptr = (*node_ptr).predecessor;
        }

        self.distance = distance;
        self.load = load;
        self.overload = load - problem.vehicle_capacity;
        self.time_warp = (*last_node_ptr).tw_before.total_time_warp();
        self.num_customers = num_customers;
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut customers: Vec<usize> = Vec::new();
        let mut next_node_ptr = self.start_depot;
        while !next_node_ptr.is_null() {
            unsafe {
                let node = &*next_node_ptr;
                if !node.is_depot() {
                    customers.push(node.client);
                }
                next_node_ptr = node.successor;
            }
        }
        write!(f, "{:?}", customers)
    }
}
