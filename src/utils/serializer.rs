use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Context as _, Result};

use crate::solver::{Context, Individual};

pub fn write_solution_file(ctx: &Context, individual: &Individual) -> Result<()> {
    let solution_path = ctx.config.borrow().solution_path.clone();
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&solution_path)
        .with_context(|| format!("Cannot open solution file {}", solution_path))?;

    let mut route_number = 1;
    for route in individual.get_routes() {
        if !route.is_empty() {
            let mut route_string = format!("Route #{}:", route_number);
            for stop in route.iter() {
                route_string.push_str(&format!(" {}", stop));
            }
            route_number += 1;
            writeln!(file, "{}", route_string).context("Failed to write to solution file")?;
        }
    }
    writeln!(file, "Cost {}", individual.cost()).context("Failed to write to solution file")?;

    Ok(())
}
