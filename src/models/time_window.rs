use std::cmp::{max, min};

use crate::models::{IntType, ProblemData};

/// Summary of a contiguous client sub-sequence of a route under forward
/// traversal. `tw_early` and `tw_late` bound the start times at `idx_first`
/// for which the segment completes without additional time warp; `time_warp`
/// is the warp the segment incurs in isolation.
///
/// Merging is associative, which is what allows a route to keep prefix and
/// suffix segments per node and evaluate any recombination of bounded many
/// sub-segments in constant time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeWindowSegment {
    pub idx_first: usize,
    pub idx_last: usize,
    pub duration: IntType,
    pub time_warp: IntType,
    pub tw_early: IntType,
    pub tw_late: IntType,
}

impl TimeWindowSegment {
    /// Segment covering the single given client.
    pub fn from_client(problem: &ProblemData, client: usize) -> Self {
        let data = problem.client(client);
        Self {
            idx_first: client,
            idx_last: client,
            duration: data.service_duration,
            time_warp: 0,
            tw_early: data.tw.earliest,
            tw_late: data.tw.latest,
        }
    }

    /// Concatenate `self` with the segment directly following it. Chain the
    /// calls to fold longer sequences left to right.
    pub fn merge(self, other: Self, problem: &ProblemData) -> Self {
        let dist = problem.dist(self.idx_last, other.idx_first);
        let delta = self.duration - self.time_warp + dist;
        let delta_wait = max(other.tw_early - delta - self.tw_late, 0);
        let delta_tw = max(self.tw_early + delta - other.tw_late, 0);

        Self {
            idx_first: self.idx_first,
            idx_last: other.idx_last,
            duration: self.duration + other.duration + dist + delta_wait,
            time_warp: self.time_warp + other.time_warp + delta_tw,
            tw_early: max(other.tw_early - delta, self.tw_early) - delta_tw,
            tw_late: min(other.tw_late - delta, self.tw_late) + delta_wait,
        }
    }

    #[inline]
    pub fn total_time_warp(&self) -> IntType {
        self.time_warp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, Coordinate, Matrix, TimeWindow};

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

    fn fold(problem: &ProblemData, path: &[usize]) -> TimeWindowSegment {
        let mut tws = TimeWindowSegment::from_client(problem, path[0]);
        for &client in &path[1..] {
            tws = tws.merge(TimeWindowSegment::from_client(problem, client), problem);
        }
        tws
    }

    #[test]
    fn singleton() {
        let problem = ok_small();
        let tws = TimeWindowSegment::from_client(&problem, 3);

        assert_eq!(tws.idx_first, 3);
        assert_eq!(tws.idx_last, 3);
        assert_eq!(tws.duration, 420);
        assert_eq!(tws.total_time_warp(), 0);
        assert_eq!(tws.tw_early, 8400);
        assert_eq!(tws.tw_late, 15300);
    }

    #[test]
    fn merge_computes_time_warp() {
        let problem = ok_small();

        // Driving 0 -> 1 -> 3, service at 1 cannot start before 15'600 and
        // ends at 15'960. We then arrive at 3 at 15'960 + 1'427, which is
        // past its closing time of 15'300: the difference is pure time warp.
        let tws = fold(&problem, &[0, 1, 3, 0]);
        assert_eq!(tws.total_time_warp(), 15600 + 360 + 1427 - 15300);

        let feasible = fold(&problem, &[0, 2, 4, 0]);
        assert_eq!(feasible.total_time_warp(), 0);
    }

    #[test]
    fn merge_is_associative() {
        let problem = ok_small();
        let paths: [&[usize]; 4] = [
            &[0, 1, 2, 3, 4, 0],
            &[0, 4, 3, 1, 2, 0],
            &[0, 2, 4, 0],
            &[1, 3, 2],
        ];

        for path in paths {
            let singletons: Vec<_> = path
                .iter()
                .map(|&client| TimeWindowSegment::from_client(&problem, client))
                .collect();

            // Left fold.
            let mut left = singletons[0];
            for &tws in &singletons[1..] {
                left = left.merge(tws, &problem);
            }

            // Right fold.
            let mut right = singletons[path.len() - 1];
            for &tws in singletons[..path.len() - 1].iter().rev() {
                right = tws.merge(right, &problem);
            }

            assert_eq!(left, right);

            // Every split point yields the same summary.
            for split in 1..path.len() {
                let front = fold(&problem, &path[..split]);
                let back = fold(&problem, &path[split..]);
                assert_eq!(front.merge(back, &problem), left);
            }
        }
    }
}
