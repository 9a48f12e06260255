/// Integer type used for distances, durations, loads and penalized costs.
/// Instance sizes are bounded such that 64-bit accumulation never overflows.
pub type IntType = i64;
