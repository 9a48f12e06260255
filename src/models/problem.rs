use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{IntType, Matrix};

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct Coordinate {
    pub x: IntType,
    pub y: IntType,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct TimeWindow {
    pub earliest: IntType,
    pub latest: IntType,
}

/// A client in the instance. Client 0 is the depot: zero demand, zero service
/// duration, and a time window spanning the planning horizon.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Client {
    pub id: usize,
    pub coord: Coordinate,
    pub demand: IntType,
    pub service_duration: IntType,
    pub tw: TimeWindow,
}

#[derive(Debug)]
pub struct ProblemData {
    pub clients: Vec<Client>,
    pub distance: Matrix<IntType>,
    pub num_vehicles: usize,
    pub vehicle_capacity: IntType,
}

impl ProblemData {
    pub fn new(
        clients: Vec<Client>,
        distance: Matrix<IntType>,
        num_vehicles: usize,
        vehicle_capacity: IntType,
    ) -> Self {
        Self {
            clients,
            distance,
            num_vehicles,
            vehicle_capacity,
        }
    }

    /// Read an instance from the sectioned text format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::utils::parse_instance(path)
    }

    /// Dimension of the problem, depot included.
    pub fn dim(&self) -> usize {
        self.clients.len()
    }

    /// Number of customer clients, depot excluded.
    pub fn num_clients(&self) -> usize {
        self.dim() - 1
    }

    #[inline]
    pub fn client(&self, idx: usize) -> &Client {
        &self.clients[idx]
    }

    #[inline]
    pub fn dist(&self, from: usize, to: usize) -> IntType {
        self.distance.get(from, to)
    }

    /// Sum of consecutive-pair distances along the given visit sequence.
    pub fn path_dist(&self, path: &[usize]) -> IntType {
        path.windows(2).map(|leg| self.dist(leg[0], leg[1])).sum()
    }

    /// Euclidean distance matrix rounded to the nearest integer.
    pub fn euclidean_matrix(clients: &[Client]) -> Matrix<IntType> {
        let dim = clients.len();
        let mut matrix = Matrix::new(dim, dim);
        for i in 0..dim {
            for j in 0..dim {
                if i != j {
                    let dx = (clients[i].coord.x - clients[j].coord.x) as f64;
                    let dy = (clients[i].coord.y - clients[j].coord.y) as f64;
                    matrix.set(i, j, (dx * dx + dy * dy).sqrt().round() as IntType);
                }
            }
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: usize, x: IntType, y: IntType) -> Client {
        Client {
            id,
            coord: Coordinate { x, y },
            demand: 1,
            service_duration: 0,
            tw: TimeWindow {
                earliest: 0,
                latest: 1000,
            },
        }
    }

    #[test]
    fn euclidean_distances_round_to_nearest() {
        let clients = vec![client(0, 0, 0), client(1, 3, 4), client(2, 1, 1)];
        let matrix = ProblemData::euclidean_matrix(&clients);

        assert_eq!(matrix.get(0, 0), 0);
        assert_eq!(matrix.get(0, 1), 5);
        assert_eq!(matrix.get(1, 0), 5);
        // sqrt(2) rounds to 1
        assert_eq!(matrix.get(0, 2), 1);
        // sqrt(4 + 9) = 3.6.. rounds to 4
        assert_eq!(matrix.get(1, 2), 4);
    }

    #[test]
    fn path_dist_sums_consecutive_legs() {
        let clients = vec![client(0, 0, 0), client(1, 3, 4), client(2, 6, 8)];
        let distance = ProblemData::euclidean_matrix(&clients);
        let problem = ProblemData::new(clients, distance, 1, 10);

        assert_eq!(problem.path_dist(&[0, 1, 2, 0]), 5 + 5 + 10);
        assert_eq!(problem.path_dist(&[0, 2]), 10);
        assert_eq!(problem.path_dist(&[1]), 0);
        assert_eq!(problem.path_dist(&[]), 0);
    }
}
