use std::cmp::max;

use crate::config::Config;
use crate::models::IntType;

/// Maps load excess and time warp to penalized cost. The multipliers are
/// adjusted by the surrounding search controller between epochs; no operator
/// evaluation may be in flight during an update.
#[derive(Clone, Debug)]
pub struct PenaltyManager {
    pub vehicle_capacity: IntType,
    capacity_penalty: IntType,
    time_warp_penalty: IntType,
}

impl PenaltyManager {
    pub fn new(
        vehicle_capacity: IntType,
        capacity_penalty: IntType,
        time_warp_penalty: IntType,
    ) -> Self {
        Self {
            vehicle_capacity,
            capacity_penalty,
            time_warp_penalty,
        }
    }

    pub fn from_config(config: &Config, vehicle_capacity: IntType) -> Self {
        Self::new(
            vehicle_capacity,
            config.penalty_capacity,
            config.penalty_time_warp,
        )
    }

    #[inline]
    pub fn load_penalty(&self, load: IntType) -> IntType {
        max(load - self.vehicle_capacity, 0) * self.capacity_penalty
    }

    #[inline]
    pub fn tw_penalty(&self, time_warp: IntType) -> IntType {
        time_warp * self.time_warp_penalty
    }

    pub fn capacity_penalty(&self) -> IntType {
        self.capacity_penalty
    }

    pub fn time_warp_penalty(&self) -> IntType {
        self.time_warp_penalty
    }

    pub fn set_capacity_penalty(&mut self, penalty: IntType) {
        self.capacity_penalty = penalty;
    }

    pub fn set_time_warp_penalty(&mut self, penalty: IntType) {
        self.time_warp_penalty = penalty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_penalty_applies_to_excess_only() {
        let pm = PenaltyManager::new(10, 20, 6);

        assert_eq!(pm.load_penalty(0), 0);
        assert_eq!(pm.load_penalty(10), 0);
        assert_eq!(pm.load_penalty(11), 20);
        assert_eq!(pm.load_penalty(18), 160);
    }

    #[test]
    fn tw_penalty_is_linear() {
        let pm = PenaltyManager::new(10, 20, 6);

        assert_eq!(pm.tw_penalty(0), 0);
        assert_eq!(pm.tw_penalty(1), 6);
        assert_eq!(pm.tw_penalty(2087), 2087 * 6);
    }
}
