use clap::{App, Arg};

/// Representing the resulting command line arguments
pub struct Args {
    pub instance_path: String,
    pub solution_path: Option<String>,
    pub config_path: Option<String>,
    pub seed: Option<u64>,
}

impl Args {
    /// Setup the clap app and parse the command line arguments
    pub fn parse() -> Self {
        let matches = App::new("hybridvrptw")
            .version("0.1")
            .about("Local-search solver for the Vehicle Routing Problem with Time Windows")
            .arg(
                Arg::with_name("instance_path")
                    .required(true)
                    .help("Path to problem instance"),
            )
            .arg(
                Arg::with_name("solution_path")
                    .short("o")
                    .takes_value(true)
                    .default_value("output.sol")
                    .help("Path to solution output"),
            )
            .arg(
                Arg::with_name("config_path")
                    .short("c")
                    .takes_value(true)
                    .help("Path to a YAML config overriding the defaults"),
            )
            .arg(
                Arg::with_name("seed")
                    .short("s")
                    .takes_value(true)
                    .help("Seed for a deterministic run"),
            )
            .get_matches();

        let instance_path = matches
            .value_of("instance_path")
            .expect("Instance path is not provided")
            .to_owned();

        let solution_path = matches.value_of("solution_path").map(String::from);

        let config_path = matches.value_of("config_path").map(String::from);

        let seed = matches
            .value_of("seed")
            .map(|value| value.parse::<u64>().expect("Invalid seed argument!"));

        Self {
            instance_path,
            solution_path,
            config_path,
            seed,
        }
    }
}
