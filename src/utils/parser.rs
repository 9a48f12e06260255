use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::models::{Client, Coordinate, IntType, Matrix, ProblemData, TimeWindow};

type Lines = Vec<Vec<String>>;

enum EdgeWeightType {
    Euclidean2D,
    Explicit,
}

impl FromStr for EdgeWeightType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "EUC_2D" => Ok(Self::Euclidean2D),
            "EXPLICIT" => Ok(Self::Explicit),
            _ => Err(anyhow!("invalid instance: unknown EDGE_WEIGHT_TYPE {}", s)),
        }
    }
}

/// Parse a VRPTW instance in the sectioned text format: `DIMENSION`,
/// `CAPACITY` and `VEHICLES` headers, node coordinates, demands, time
/// windows and service times per client, and either rounded Euclidean
/// distances or an explicit full matrix.
pub fn parse_instance<P: AsRef<Path>>(path: P) -> Result<ProblemData> {
    let lines = read_file(path.as_ref())?;

    let dimension: usize = header_value(&lines, "DIMENSION")?;
    if dimension < 2 {
        return Err(anyhow!("invalid instance: needs a depot and a client"));
    }
    let capacity: IntType = header_value(&lines, "CAPACITY")?;
    let num_vehicles: usize = header_value(&lines, "VEHICLES")?;

    let coords = section(&lines, "NODE_COORD_SECTION", dimension)?
        .iter()
        .map(|line| {
            Ok(Coordinate {
                x: field(line, 1)?,
                y: field(line, 2)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let demands = section(&lines, "DEMAND_SECTION", dimension)?
        .iter()
        .map(|line| field(line, 1))
        .collect::<Result<Vec<IntType>>>()?;

    let windows = section(&lines, "TIME_WINDOW_SECTION", dimension)?
        .iter()
        .map(|line| {
            Ok(TimeWindow {
                earliest: field(line, 1)?,
                latest: field(line, 2)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let services = section(&lines, "SERVICE_TIME_SECTION", dimension)?
        .iter()
        .map(|line| field(line, 1))
        .collect::<Result<Vec<IntType>>>()?;

    if demands[0] != 0 {
        return Err(anyhow!("invalid instance: depot demand must be zero"));
    }

    let clients: Vec<Client> = (0..dimension)
        .map(|id| Client {
            id,
            coord: coords[id],
            demand: demands[id],
            service_duration: services[id],
            tw: windows[id],
        })
        .collect();

    // Euclidean rounded to integers unless an explicit matrix is given.
    let edge_weight_type = match find_header(&lines, "EDGE_WEIGHT_TYPE") {
        Some(line) => line[1].parse::<EdgeWeightType>()?,
        None => EdgeWeightType::Euclidean2D,
    };

    let distance = match edge_weight_type {
        EdgeWeightType::Euclidean2D => ProblemData::euclidean_matrix(&clients),
        EdgeWeightType::Explicit => full_matrix(&lines, dimension)?,
    };

    Ok(ProblemData::new(clients, distance, num_vehicles, capacity))
}

fn read_file(path: &Path) -> Result<Lines> {
    let file = File::open(path)
        .map_err(|err| anyhow!("invalid instance: cannot open {}: {}", path.display(), err))?;
    let reader = BufReader::new(file);
    let line_strings: Vec<String> = reader.lines().filter_map(|line| line.ok()).collect();

    Ok(line_strings
        .iter()
        .map(|line| {
            line.split(&[' ', '\t', ':'][..])
                .filter(|value| !value.is_empty())
                .map(|value| value.to_owned())
                .collect()
        })
        .collect())
}

fn find_header<'a>(lines: &'a Lines, name: &str) -> Option<&'a Vec<String>> {
    lines
        .iter()
        .find(|line| !line.is_empty() && line[0] == name && line.len() > 1)
}

fn header_value<T: FromStr>(lines: &Lines, name: &str) -> Result<T> {
    let line =
        find_header(lines, name).ok_or_else(|| anyhow!("invalid instance: missing {}", name))?;
    line[1]
        .parse::<T>()
        .map_err(|_| anyhow!("invalid instance: cannot parse {} value {}", name, line[1]))
}

fn section<'a>(lines: &'a Lines, name: &str, rows: usize) -> Result<&'a [Vec<String>]> {
    for (line_number, line) in lines.iter().enumerate() {
        if !line.is_empty() && line[0] == name {
            let start = line_number + 1;
            if start + rows > lines.len() {
                return Err(anyhow!("invalid instance: truncated {}", name));
            }
            return Ok(&lines[start..start + rows]);
        }
    }
    Err(anyhow!("invalid instance: missing {}", name))
}

fn field<T: FromStr>(line: &[String], index: usize) -> Result<T> {
    let value = line
        .get(index)
        .ok_or_else(|| anyhow!("invalid instance: short row {:?}", line))?;
    value
        .parse::<T>()
        .map_err(|_| anyhow!("invalid instance: cannot parse value {}", value))
}

fn full_matrix(lines: &Lines, dimension: usize) -> Result<Matrix<IntType>> {
    let rows = section(lines, "EDGE_WEIGHT_SECTION", dimension)?;
    let mut matrix = Matrix::new(dimension, dimension);
    for (row_number, row) in rows.iter().enumerate() {
        if row.len() != dimension {
            return Err(anyhow!(
                "invalid instance: edge weight row {} has {} entries, expected {}",
                row_number,
                row.len(),
                dimension
            ));
        }
        for (col_number, value) in row.iter().enumerate() {
            matrix.set(
                row_number,
                col_number,
                value
                    .parse::<IntType>()
                    .map_err(|_| anyhow!("invalid instance: cannot parse edge weight {}", value))?,
            );
        }
    }
    Ok(matrix)
}
