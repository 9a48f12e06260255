use std::fs::File;
use std::io::BufReader;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::IntType;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    // General
    pub instance_path: String,
    pub solution_path: String,

    // Randomization
    pub deterministic: bool,
    pub seed: u64,

    // Local Search
    pub granularity: u64,

    // Exchange moves: relocate a segment of one, two or three clients, or
    // swap segments of the given lengths
    pub relocate_single: bool,
    pub relocate_double: bool,
    pub relocate_triple: bool,
    pub swap_one_with_one: bool,
    pub swap_two_with_one: bool,
    pub swap_two_with_two: bool,
    pub swap_three_with_one: bool,
    pub swap_three_with_two: bool,
    pub swap_three_with_three: bool,

    // Penalties
    pub penalty_capacity: IntType,
    pub penalty_time_warp: IntType,
}

impl Config {
    pub fn default() -> Self {
        Self {
            // General
            instance_path: String::new(),
            solution_path: "output.sol".to_owned(),

            // Randomization
            deterministic: false,
            seed: 1,

            // Local Search
            granularity: 20,

            // Exchange moves
            relocate_single: true,
            relocate_double: true,
            relocate_triple: true,
            swap_one_with_one: true,
            swap_two_with_one: true,
            swap_two_with_two: true,
            swap_three_with_one: true,
            swap_three_with_two: true,
            swap_three_with_three: true,

            // Penalties
            penalty_capacity: 20,
            penalty_time_warp: 6,
        }
    }

    pub fn reset(&mut self) {
        let new_config = Self::default();
        *self = new_config;
    }

    fn read_yaml_file(filepath: &str) -> Value {
        let file = File::open(filepath).expect(&format!("Cannot open file {}", filepath));
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).expect(&format!("Failed to read file {}", filepath))
    }

    pub fn load_yaml_file(filepath: &str) -> Self {
        // Load default
        let mut config = Self::default();

        // Patch default with loaded values
        config.patch(&Self::read_yaml_file(filepath));
        config
    }

    pub fn patch_from_yaml_file(&mut self, filepath: &str) {
        self.patch(&Self::read_yaml_file(filepath));
    }

    pub fn patch(&mut self, values: &Value) {
        let mut config: Value = serde_json::to_value(&self).expect("Failed to serialize config");
        match values {
            Value::Object(values_map) => {
                // Iterate over all key-value pairs in the provided values and update the config
                for (key, value) in values_map.iter() {
                    // The key is like a file path. A key at top level starts with /
                    let root_key = format!("/{}", key);
                    if let Some(config_value) = config.pointer_mut(&root_key) {
                        *config_value = value.clone();
                    }
                }
            }
            _ => panic!("Cannot patch Config as JSON is not an Object"),
        }
        // Update the config object
        *self = serde_json::from_value(config).expect("Failed to deserialize patched config");
    }
}
