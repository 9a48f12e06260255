mod exchange;
pub use self::exchange::*;

use crate::models::IntType;
use crate::solver::improvement::{LocalSearch, Node};
use crate::solver::Context;

/// A neighbourhood operator over node pairs: price the candidate move
/// defined by (u, v), then perform it in place.
pub trait LocalSearchOperator {
    fn name(&self) -> String;

    /// Cost delta of the move; zero when the move is filtered out or
    /// degenerate. Equals the recomputed cost difference when the move is
    /// applied on a copy.
    unsafe fn evaluate(&self, ls: &LocalSearch, node_u: *mut Node, node_v: *mut Node) -> IntType;

    /// Perform the move and restore the caches of both affected routes.
    unsafe fn apply(&self, ls: &mut LocalSearch, node_u: *mut Node, node_v: *mut Node);
}

pub struct Moves {
    pub node: Vec<Box<dyn LocalSearchOperator>>,
}

impl Moves {
    pub fn new(ctx: &Context) -> Self {
        let config = ctx.config.borrow();
        let mut node: Vec<Box<dyn LocalSearchOperator>> = Vec::new();
        if config.relocate_single {
            node.push(Box::new(Exchange::<1, 0>));
        }
        if config.relocate_double {
            node.push(Box::new(Exchange::<2, 0>));
        }
        if config.relocate_triple {
            node.push(Box::new(Exchange::<3, 0>));
        }
        if config.swap_one_with_one {
            node.push(Box::new(Exchange::<1, 1>));
        }
        if config.swap_two_with_one {
            node.push(Box::new(Exchange::<2, 1>));
        }
        if config.swap_two_with_two {
            node.push(Box::new(Exchange::<2, 2>));
        }
        if config.swap_three_with_one {
            node.push(Box::new(Exchange::<3, 1>));
        }
        if config.swap_three_with_two {
            node.push(Box::new(Exchange::<3, 2>));
        }
        if config.swap_three_with_three {
            node.push(Box::new(Exchange::<3, 3>));
        }
        Self { node }
    }
}
