use anyhow::Result;

use hybridvrptw::cli::Args;
use hybridvrptw::config::Config;
use hybridvrptw::models::ProblemData;
use hybridvrptw::solver::improvement::LocalSearch;
use hybridvrptw::solver::{Context, Individual, PenaltyManager};
use hybridvrptw::utils;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .format_module_path(false)
        .init();

    let args = Args::parse();

    let mut config = Config::default();
    if let Some(config_path) = &args.config_path {
        config.patch_from_yaml_file(config_path);
    }
    config.instance_path = args.instance_path;
    if let Some(solution_path) = args.solution_path {
        config.solution_path = solution_path;
    }
    if let Some(seed) = args.seed {
        config.deterministic = true;
        config.seed = seed;
    }

    let problem = ProblemData::from_file(&config.instance_path)?;
    log::info!("Loading problem {} complete", config.instance_path);

    let penalty = PenaltyManager::from_config(&config, problem.vehicle_capacity);
    let ctx = Context::new(problem, config);

    let mut individual = Individual::new(&ctx, &penalty, initial_routes(&ctx.problem))?;
    log::info!("Initial cost: {}", individual.cost());

    let mut local_search = LocalSearch::new(&ctx);
    local_search.run(&mut individual, &penalty);
    log::info!(
        "Local search complete, cost: {}, feasible: {}",
        individual.cost(),
        individual.is_feasible()
    );

    utils::write_solution_file(&ctx, &individual)
}

// Greedy capacity packing in instance order. Overflow joins the last route;
// the local search repairs through the penalty terms.
fn initial_routes(problem: &ProblemData) -> Vec<Vec<usize>> {
    let mut routes = vec![Vec::new(); problem.num_vehicles];
    let mut route_index = 0;
    let mut load = 0;

    for client in 1..problem.dim() {
        let demand = problem.client(client).demand;
        let full = !routes[route_index].is_empty() && load + demand > problem.vehicle_capacity;
        if full && route_index + 1 < problem.num_vehicles {
            route_index += 1;
            load = 0;
        }
        routes[route_index].push(client);
        load += demand;
    }

    routes
}
