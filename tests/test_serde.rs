#![cfg(feature = "serde")]

use seaopt::{
    algorithm::{Algorithm, Sea},
    population::Population,
    problem::{Problem, Rosenbrock},
    registry::Registry,
    snapshot::{AlgorithmSnapshot, PopulationSnapshot},
};

fn evolved_setup() -> (Population, Algorithm) {
    let problem = Problem::new(Rosenbrock::new(25).unwrap()).unwrap();
    let pop = Population::new(problem, 5, 23).unwrap();
    let mut algorithm = Algorithm::new(Sea::new(10, 23).unwrap());
    algorithm.set_verbosity(1);
    let pop = algorithm.evolve(&pop).unwrap();
    (pop, algorithm)
}

#[test]
fn test_algorithm_json_round_trip_is_bit_exact() {
    let registry = Registry::with_builtins();
    let (_, algorithm) = evolved_setup();
    let before_log = algorithm.extract::<Sea>().unwrap().get_log().to_vec();

    let json = serde_json::to_string(&algorithm.snapshot()).unwrap();
    let snapshot: AlgorithmSnapshot = serde_json::from_str(&json).unwrap();
    let restored = registry.restore_algorithm(&snapshot).unwrap();

    let after_log = restored.extract::<Sea>().unwrap().get_log();
    assert_eq!(after_log.len(), before_log.len());
    for (before, after) in before_log.iter().zip(after_log) {
        assert_eq!(before.generation, after.generation);
        assert_eq!(before.fevals, after.fevals);
        assert_eq!(before.best.to_bits(), after.best.to_bits());
        assert_eq!(before.improvement.to_bits(), after.improvement.to_bits());
        assert_eq!(before.sigma.to_bits(), after.sigma.to_bits());
    }
    assert_eq!(restored.snapshot(), algorithm.snapshot());
    assert_eq!(restored.to_string(), algorithm.to_string());
}

#[test]
fn test_population_json_round_trip() {
    let registry = Registry::with_builtins();
    let (pop, _) = evolved_setup();

    let json = serde_json::to_string(&pop.snapshot()).unwrap();
    let snapshot: PopulationSnapshot = serde_json::from_str(&json).unwrap();
    let restored = Population::restore(&snapshot, &registry).unwrap();

    assert_eq!(restored.snapshot(), pop.snapshot());
}

#[test]
fn test_log_lines_serialize() {
    let (_, algorithm) = evolved_setup();
    let log = algorithm.extract::<Sea>().unwrap().get_log();
    let json = serde_json::to_string(log).unwrap();
    let parsed: Vec<seaopt::SeaLogLine> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, log);
}
