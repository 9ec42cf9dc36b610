#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_drive::simulation::error::{ConfigError, LoadError};
use evo_drive::simulation::params::{Params, StartCheckpoint};
use evo_drive::simulation::policy::{GENOME_LEN, Genome};
use evo_drive::simulation::rng::create_rng;
use std::fs;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("evo_drive_{}_{name}", std::process::id()))
}

fn create_test_params() -> Params {
    Params {
        seed: 99,
        population_size: 12,
        generations: 5,
        max_frames_per_generation: 120,
        mutation_rate: 0.3,
        start_checkpoint: StartCheckpoint::Index(3),
        parallel: true,
        ..Params::default()
    }
}

#[test]
fn test_save_and_load_params() {
    let params = create_test_params();
    let save_path = temp_path("params.json");

    params.save_to_file(&save_path).expect("Failed to save params");
    let loaded = Params::load_from_file(&save_path).expect("Failed to load params");

    assert_eq!(loaded, params);

    // Clean up
    fs::remove_file(save_path).ok();
}

#[test]
fn test_save_creates_valid_json() {
    let params = create_test_params();
    let save_path = temp_path("valid.json");

    params.save_to_file(&save_path).expect("Failed to save");

    let json_content = fs::read_to_string(&save_path).expect("Failed to read save file");
    let parsed: serde_json::Value = serde_json::from_str(&json_content).expect("Invalid JSON");

    assert_eq!(parsed["population_size"], 12);
    assert_eq!(parsed["start_checkpoint"]["index"], 3);
    assert!(parsed.get("track").is_some());

    fs::remove_file(save_path).ok();
}

#[test]
fn test_missing_fields_use_defaults() {
    let save_path = temp_path("partial.json");
    fs::write(&save_path, r#"{ "seed": 5, "track": { "inner_side": 250.0 } }"#)
        .expect("Failed to write test file");

    let loaded = Params::load_from_file(&save_path).expect("Failed to load");
    let defaults = Params::default();

    assert_eq!(loaded.seed, 5);
    assert_eq!(loaded.track.inner_side, 250.0);
    assert_eq!(loaded.track.outer_side, defaults.track.outer_side);
    assert_eq!(loaded.population_size, defaults.population_size);
    assert_eq!(loaded.start_checkpoint, StartCheckpoint::Last);

    fs::remove_file(save_path).ok();
}

#[test]
fn test_load_nonexistent_file() {
    let result = Params::load_from_file(temp_path("does_not_exist.json"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn test_load_invalid_json() {
    let invalid_path = temp_path("invalid.json");
    fs::write(&invalid_path, "{ this is not valid json }").expect("Failed to write test file");

    let result = Params::load_from_file(&invalid_path);
    assert!(matches!(result, Err(LoadError::Parse(_))));

    fs::remove_file(invalid_path).ok();
}

#[test]
fn test_load_rejects_invalid_params() {
    let odd_path = temp_path("odd.json");
    fs::write(&odd_path, r#"{ "population_size": 7 }"#).expect("Failed to write test file");

    let result = Params::load_from_file(&odd_path);
    assert!(matches!(
        result,
        Err(LoadError::Invalid(ConfigError::OddPopulationSize(7)))
    ));

    fs::remove_file(odd_path).ok();
}

#[test]
fn test_genome_serde_preserves_weights() {
    let mut rng = create_rng(3);
    let genome = Genome::random(&mut rng, -5.0, 5.0);

    let json = serde_json::to_string(&genome).expect("Failed to encode genome");
    let loaded: Genome = serde_json::from_str(&json).expect("Failed to decode genome");
    assert_eq!(loaded, genome);

    // a genome of the wrong length does not decode
    let short = ndarray::Array1::<f32>::zeros(GENOME_LEN - 2);
    let json = serde_json::to_string(&short).expect("Failed to encode array");
    assert!(serde_json::from_str::<Genome>(&json).is_err());
}
