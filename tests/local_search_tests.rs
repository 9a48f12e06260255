//! Tests for the route caches kept by the local search and for the driver
//! as a whole.

use hybridvrptw::config::Config;
use hybridvrptw::models::{Client, Coordinate, IntType, Matrix, ProblemData, TimeWindow};
use hybridvrptw::solver::improvement::LocalSearch;
use hybridvrptw::solver::{Context, Individual, PenaltyManager};

fn ok_small() -> ProblemData {
    let rows: [[IntType; 5]; 5] = [
        [0, 1544, 1944, 1931, 1476],
        [1726, 0, 1992, 1427, 1593],
        [1965, 1975, 0, 621, 1090],
        [2063, 1433, 647, 0, 818],
        [1475, 1594, 1090, 828, 0],
    ];
    let coords = [(2334, 726), (226, 1297), (590, 530), (435, 718), (1191, 639)];
    let demands = [0, 5, 5, 3, 5];
    let services = [0, 360, 360, 420, 360];
    let windows = [
        (0, 45000),
        (15600, 22500),
        (12000, 19500),
        (8400, 15300),
        (8400, 15300),
    ];

    let clients = (0..5)
        .map(|idx| Client {
            id: idx,
            coord: Coordinate {
                x: coords[idx].0,
                y: coords[idx].1,
            },
            demand: demands[idx],
            service_duration: services[idx],
            tw: TimeWindow {
                earliest: windows[idx].0,
                latest: windows[idx].1,
            },
        })
        .collect();

    let mut distance = Matrix::new(5, 5);
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            distance.set(i, j, value);
        }
    }

    ProblemData::new(clients, distance, 3, 10)
}

/// Twelve clients around the depot, four vehicles of capacity 20.
fn twelve_clients() -> ProblemData {
    let coords = [
        (50, 50),
        (10, 20),
        (25, 85),
        (40, 10),
        (65, 90),
        (90, 15),
        (15, 60),
        (80, 70),
        (35, 35),
        (60, 25),
        (5, 90),
        (95, 55),
        (70, 5),
    ];
    let demands = [0, 4, 7, 3, 6, 5, 2, 7, 4, 3, 6, 5, 2];
    let windows = [
        (0, 2000),
        (0, 400),
        (100, 600),
        (0, 500),
        (200, 900),
        (0, 800),
        (50, 700),
        (300, 1200),
        (0, 600),
        (100, 900),
        (400, 1300),
        (200, 1100),
        (0, 1000),
    ];

    let clients: Vec<Client> = (0..13)
        .map(|idx| Client {
            id: idx,
            coord: Coordinate {
                x: coords[idx].0,
                y: coords[idx].1,
            },
            demand: demands[idx],
            service_duration: 15,
            tw: TimeWindow {
                earliest: windows[idx].0,
                latest: windows[idx].1,
            },
        })
        .collect();

    let distance = ProblemData::euclidean_matrix(&clients);
    ProblemData::new(clients, distance, 4, 20)
}

fn context(problem: ProblemData) -> Context {
    let mut config = Config::default();
    config.deterministic = true;
    config.seed = 11;
    Context::new(problem, config)
}

fn penalty(ctx: &Context) -> PenaltyManager {
    PenaltyManager::from_config(&ctx.config.borrow(), ctx.problem.vehicle_capacity)
}

fn assert_valid_routing(ctx: &Context, individual: &Individual) {
    let routes = individual.get_routes();
    assert_eq!(routes.len(), ctx.problem.num_vehicles);

    // Every client exactly once.
    let mut clients: Vec<usize> = routes.iter().flatten().copied().collect();
    clients.sort_unstable();
    let expected: Vec<usize> = (1..ctx.problem.dim()).collect();
    assert_eq!(clients, expected);

    // Empty routes sort last.
    let mut seen_empty = false;
    for route in routes {
        if route.is_empty() {
            seen_empty = true;
        } else {
            assert!(!seen_empty, "non-empty route after an empty one");
        }
    }
}

#[test]
fn route_caches_after_load() {
    let ctx = context(ok_small());
    let pm = penalty(&ctx);
    let indiv = Individual::new(&ctx, &pm, vec![vec![1, 3], vec![2, 4], vec![]]).unwrap();

    let mut ls = LocalSearch::new(&ctx);
    ls.load_individual(&indiv);

    let problem = &ctx.problem;
    let route = &ls.routes[0];

    assert_eq!(route.size(), 2);
    assert_eq!(route.load, 8);
    assert_eq!(route.overload, -2);
    assert!(!route.has_excess_load());
    assert_eq!(route.distance, problem.path_dist(&[0, 1, 3, 0]));
    assert_eq!(route.time_warp, 15600 + 360 + problem.dist(1, 3) - 15300);
    assert!(route.has_time_warp());
    assert!(!ls.routes[1].has_time_warp());
    assert!(ls.routes[2].is_empty());

    unsafe {
        let node1 = route.node_at(1);
        let node3 = route.node_at(2);

        // Link and position invariants.
        assert_eq!((*node1).client, 1);
        assert_eq!((*node3).client, 3);
        assert_eq!((*node1).successor, node3);
        assert_eq!((*node3).predecessor, node1);
        assert_eq!((*node1).position, 1);
        assert_eq!((*node3).position, 2);
        assert_eq!((*route.node_at(3)).client, 0);
        assert_eq!((*route.node_at(3)).position, 3);

        // Segment queries against the cumulative caches.
        assert_eq!(route.dist_between(0, 3), route.distance);
        assert_eq!(route.dist_between(1, 2), problem.dist(1, 3));
        assert_eq!(route.load_between(1, 2), 8);
        assert_eq!(route.load_between(2, 2), 3);
        assert_eq!(
            route.tw_between(0, 3, problem).total_time_warp(),
            route.time_warp
        );

        // Prefix and suffix summaries agree with the route total.
        assert_eq!((*route.node_at(3)).tw_before.total_time_warp(), route.time_warp);
        assert_eq!((*node1).tw_after.total_time_warp(), route.time_warp);
    }
}

#[test]
fn driver_improves_bad_solution() {
    let ctx = context(ok_small());
    let pm = penalty(&ctx);

    let mut indiv = Individual::new(&ctx, &pm, vec![vec![1, 2, 3, 4], vec![], vec![]]).unwrap();
    let initial_cost = indiv.cost();

    let mut ls = LocalSearch::new(&ctx);
    ls.run(&mut indiv, &pm);

    assert!(indiv.cost() < initial_cost);
    assert_valid_routing(&ctx, &indiv);

    // The write-back is consistent: building a fresh individual from the
    // same routes yields the same cost.
    let rebuilt = Individual::new(&ctx, &pm, indiv.get_routes().to_vec()).unwrap();
    assert_eq!(rebuilt.cost(), indiv.cost());
}

#[test]
fn driver_preserves_invariants_on_larger_instance() {
    let ctx = context(twelve_clients());
    let pm = penalty(&ctx);

    // Greedy capacity packing in instance order as a deliberately bad start.
    let mut routes = vec![Vec::new(); ctx.problem.num_vehicles];
    let mut route_index = 0;
    let mut load = 0;
    for client in 1..ctx.problem.dim() {
        let demand = ctx.problem.client(client).demand;
        if !routes[route_index].is_empty()
            && load + demand > ctx.problem.vehicle_capacity
            && route_index + 1 < ctx.problem.num_vehicles
        {
            route_index += 1;
            load = 0;
        }
        routes[route_index].push(client);
        load += demand;
    }

    let mut indiv = Individual::new(&ctx, &pm, routes).unwrap();
    let initial_cost = indiv.cost();

    let mut ls = LocalSearch::new(&ctx);
    ls.run(&mut indiv, &pm);

    assert!(indiv.cost() <= initial_cost);
    assert_valid_routing(&ctx, &indiv);

    // A second descent from the local optimum cannot make things worse.
    let cost_after_first = indiv.cost();
    ls.run(&mut indiv, &pm);
    assert!(indiv.cost() <= cost_after_first);
    assert_valid_routing(&ctx, &indiv);
}
