use std::cmp::min;

use crate::models::IntType;
use crate::solver::improvement::moves::LocalSearchOperator;
use crate::solver::improvement::{insert_node, swap_nodes, LocalSearch, Node};

/// Exchanges the `N` consecutive clients starting at U with the `M`
/// consecutive clients starting at V. As special cases, (1, 0) is pure
/// relocate and (1, 1) pure swap.
pub struct Exchange<const N: usize, const M: usize>;

impl<const N: usize, const M: usize> Exchange<N, M> {
    const VALID: () = assert!(N >= M && N >= 1, "N < M or N == 0 does not make sense");

    /// Whether the segment of the given length starting at `node` runs into
    /// a depot sentinel.
    #[inline]
    unsafe fn contains_depot(node: *mut Node, seg_length: usize) -> bool {
        if (*node).is_depot() {
            return true;
        }
        // size() is the position of the last client in the route, so the
        // segment reaches the end depot if position + length - 1 exceeds it.
        (*node).position + seg_length - 1 > (*(*node).route).size()
    }

    /// Whether the two segments overlap in the same route.
    #[inline]
    unsafe fn overlap(node_u: *mut Node, node_v: *mut Node) -> bool {
        (*node_u).route == (*node_v).route
            && (*node_u).position as IntType <= (*node_v).position as IntType + M as IntType - 1
            && (*node_v).position as IntType <= (*node_u).position as IntType + N as IntType - 1
    }

    /// Whether the two segments are directly adjacent in the same route.
    #[inline]
    unsafe fn adjacent(node_u: *mut Node, node_v: *mut Node) -> bool {
        if (*node_u).route != (*node_v).route {
            return false;
        }
        (*node_u).position + N == (*node_v).position
            || (*node_v).position + M == (*node_u).position
    }

    // Special case that's applied when M == 0
    unsafe fn eval_relocate(ls: &LocalSearch, node_u: *mut Node, node_v: *mut Node) -> IntType {
        let problem = &ls.ctx.problem;

        let route_u = (*node_u).route;
        let route_v = (*node_v).route;
        let pos_u = (*node_u).position;
        let pos_v = (*node_v).position;

        let end_u = if N == 1 {
            node_u
        } else {
            (*route_u).node_at(pos_u + N - 1)
        };
        let u_prev = (*node_u).predecessor;
        let after_u = (*end_u).successor;
        let v_next = (*node_v).successor;

        let current = (*route_u).dist_between(pos_u - 1, pos_u + N)
            + problem.dist((*node_v).client, (*v_next).client);
        let proposed = problem.dist((*node_v).client, (*node_u).client)
            + (*route_u).dist_between(pos_u, pos_u + N - 1)
            + problem.dist((*end_u).client, (*v_next).client)
            + problem.dist((*u_prev).client, (*after_u).client);

        let mut delta_cost = proposed - current;

        if route_u != route_v {
            if (*route_u).is_feasible() && delta_cost >= 0 {
                return delta_cost;
            }

            let u_tws = (*u_prev).tw_before.merge((*after_u).tw_after, problem);

            delta_cost += ls.penalty.tw_penalty(u_tws.total_time_warp());
            delta_cost -= ls.penalty.tw_penalty((*route_u).time_warp);

            let load_diff = (*route_u).load_between(pos_u, pos_u + N - 1);

            delta_cost += ls.penalty.load_penalty((*route_u).load - load_diff);
            delta_cost -= ls.penalty.load_penalty((*route_u).load);

            if delta_cost >= 0 {
                // Even without V's route, the move will never be good
                return delta_cost;
            }

            delta_cost += ls.penalty.load_penalty((*route_v).load + load_diff);
            delta_cost -= ls.penalty.load_penalty((*route_v).load);

            let v_tws = (*node_v)
                .tw_before
                .merge((*route_u).tw_between(pos_u, pos_u + N - 1, problem), problem)
                .merge((*v_next).tw_after, problem);

            delta_cost += ls.penalty.tw_penalty(v_tws.total_time_warp());
            delta_cost -= ls.penalty.tw_penalty((*route_v).time_warp);
        } else {
            let route = &*route_u;

            if !route.has_time_warp() && delta_cost >= 0 {
                return delta_cost;
            }

            let tws = if pos_u < pos_v {
                (*u_prev)
                    .tw_before
                    .merge(route.tw_between(pos_u + N, pos_v, problem), problem)
                    .merge(route.tw_between(pos_u, pos_u + N - 1, problem), problem)
                    .merge((*v_next).tw_after, problem)
            } else {
                (*node_v)
                    .tw_before
                    .merge(route.tw_between(pos_u, pos_u + N - 1, problem), problem)
                    .merge(route.tw_between(pos_v + 1, pos_u - 1, problem), problem)
                    .merge((*after_u).tw_after, problem)
            };

            delta_cost += ls.penalty.tw_penalty(tws.total_time_warp());
            delta_cost -= ls.penalty.tw_penalty(route.time_warp);
        }

        delta_cost
    }

    // Applied when M != 0
    unsafe fn eval_swap(ls: &LocalSearch, node_u: *mut Node, node_v: *mut Node) -> IntType {
        let problem = &ls.ctx.problem;

        let route_u = (*node_u).route;
        let route_v = (*node_v).route;
        let pos_u = (*node_u).position;
        let pos_v = (*node_v).position;

        let end_u = if N == 1 {
            node_u
        } else {
            (*route_u).node_at(pos_u + N - 1)
        };
        let end_v = if M == 1 {
            node_v
        } else {
            (*route_v).node_at(pos_v + M - 1)
        };

        let u_prev = (*node_u).predecessor;
        let after_u = (*end_u).successor;
        let v_prev = (*node_v).predecessor;
        let after_v = (*end_v).successor;

        let current = (*route_u).dist_between(pos_u - 1, pos_u + N)
            + (*route_v).dist_between(pos_v - 1, pos_v + M);

        //   p(U) -> V -> .. -> endV -> n(endU)
        // + p(V) -> U -> .. -> endU -> n(endV)
        let proposed = problem.dist((*u_prev).client, (*node_v).client)
            + (*route_v).dist_between(pos_v, pos_v + M - 1)
            + problem.dist((*end_v).client, (*after_u).client)
            + problem.dist((*v_prev).client, (*node_u).client)
            + (*route_u).dist_between(pos_u, pos_u + N - 1)
            + problem.dist((*end_u).client, (*after_v).client);

        let mut delta_cost = proposed - current;

        if route_u != route_v {
            if (*route_u).is_feasible() && (*route_v).is_feasible() && delta_cost >= 0 {
                return delta_cost;
            }

            let u_tws = (*u_prev)
                .tw_before
                .merge((*route_v).tw_between(pos_v, pos_v + M - 1, problem), problem)
                .merge((*after_u).tw_after, problem);

            delta_cost += ls.penalty.tw_penalty(u_tws.total_time_warp());
            delta_cost -= ls.penalty.tw_penalty((*route_u).time_warp);

            let v_tws = (*v_prev)
                .tw_before
                .merge((*route_u).tw_between(pos_u, pos_u + N - 1, problem), problem)
                .merge((*after_v).tw_after, problem);

            delta_cost += ls.penalty.tw_penalty(v_tws.total_time_warp());
            delta_cost -= ls.penalty.tw_penalty((*route_v).time_warp);

            let load_u = (*route_u).load_between(pos_u, pos_u + N - 1);
            let load_v = (*route_v).load_between(pos_v, pos_v + M - 1);
            let load_diff = load_u - load_v;

            delta_cost += ls.penalty.load_penalty((*route_u).load - load_diff);
            delta_cost -= ls.penalty.load_penalty((*route_u).load);

            delta_cost += ls.penalty.load_penalty((*route_v).load + load_diff);
            delta_cost -= ls.penalty.load_penalty((*route_v).load);
        } else {
            let route = &*route_u;

            if !route.has_time_warp() && delta_cost >= 0 {
                return delta_cost;
            }

            let tws = if pos_u < pos_v {
                (*u_prev)
                    .tw_before
                    .merge(route.tw_between(pos_v, pos_v + M - 1, problem), problem)
                    .merge(route.tw_between(pos_u + N, pos_v - 1, problem), problem)
                    .merge(route.tw_between(pos_u, pos_u + N - 1, problem), problem)
                    .merge((*after_v).tw_after, problem)
            } else {
                (*v_prev)
                    .tw_before
                    .merge(route.tw_between(pos_u, pos_u + N - 1, problem), problem)
                    .merge(route.tw_between(pos_v + M, pos_u - 1, problem), problem)
                    .merge(route.tw_between(pos_v, pos_v + M - 1, problem), problem)
                    .merge((*after_u).tw_after, problem)
            };

            delta_cost += ls.penalty.tw_penalty(tws.total_time_warp());
            delta_cost -= ls.penalty.tw_penalty(route.time_warp);
        }

        delta_cost
    }
}

impl<const N: usize, const M: usize> LocalSearchOperator for Exchange<N, M> {
    fn name(&self) -> String {
        format!("Exchange({},{})", N, M)
    }

    unsafe fn evaluate(&self, ls: &LocalSearch, node_u: *mut Node, node_v: *mut Node) -> IntType {
        let () = Self::VALID;

        if Self::contains_depot(node_u, N) || Self::overlap(node_u, node_v) {
            return 0;
        }

        if M > 0 && Self::contains_depot(node_v, M) {
            return 0;
        }

        if M == 0 {
            // Special case where nothing in V is moved
            if node_u == (*node_v).successor {
                return 0;
            }

            Self::eval_relocate(ls, node_u, node_v)
        } else {
            // Symmetric, so each unordered pair is evaluated at most once
            if N == M && (*node_u).client >= (*node_v).client {
                return 0;
            }

            if Self::adjacent(node_u, node_v) {
                return 0;
            }

            Self::eval_swap(ls, node_u, node_v)
        }
    }

    unsafe fn apply(&self, ls: &mut LocalSearch, node_u: *mut Node, node_v: *mut Node) {
        let route_u = (*node_u).route;
        let route_v = (*node_v).route;

        let mut u_to_insert = if N == 1 {
            node_u
        } else {
            (*route_u).node_at((*node_u).position + N - 1)
        };
        let insert_u_after = if M == 0 {
            node_v
        } else {
            (*route_v).node_at((*node_v).position + M - 1)
        };

        // Insert the 'extra' nodes of U's segment after the end of V's
        // segment, in reverse order to preserve the overall order
        for _ in 0..N - M {
            let prev = (*u_to_insert).predecessor;
            insert_node(u_to_insert, insert_u_after);
            u_to_insert = prev;
        }

        // ..and swap the overlapping nodes. After each swap the two pointers
        // have traded segments, so following both successors walks the next
        // pair regardless.
        let mut node_u = node_u;
        let mut node_v = node_v;
        for _ in 0..min(N, M) {
            swap_nodes(node_u, node_v);
            node_u = (*node_u).successor;
            node_v = (*node_v).successor;
        }

        ls.update_route(route_u);
        if route_u != route_v {
            ls.update_route(route_v);
        }
    }
}
