#![cfg(feature = "serde")]

use egomoo::{Bounds, InfillCriterion, Moo, MooConfig, SampleSet};

#[test]
fn config_round_trip() {
    let config = MooConfig {
        criterion: InfillCriterion::Wb2s,
        xlimits: Some(Bounds::new(vec![(0.0, 1.0), (-2.0, 2.0)]).unwrap()),
        xdoe: Some(vec![vec![0.5, 0.0]]),
        ydoe: Some(vec![vec![1.0, 2.0]]),
        random_state: Some(7),
        beta: 50.0,
        ..MooConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: MooConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn partial_config_uses_defaults() {
    let config: MooConfig =
        serde_json::from_str(r#"{"criterion": "Ehvi", "n_iter": 3}"#).unwrap();
    assert_eq!(config.criterion, InfillCriterion::Ehvi);
    assert_eq!(config.n_iter, 3);
    assert_eq!(config.n_start, MooConfig::default().n_start);
    assert!(config.xlimits.is_none());
}

#[test]
fn invalid_bounds_in_json_are_caught_on_validate() {
    let config: MooConfig =
        serde_json::from_str(r#"{"xlimits": {"limits": [[1.0, 0.0]]}}"#).unwrap();
    assert!(config.validate().unwrap_err().is_configuration());
}

#[test]
fn result_serializes_without_surrogates() {
    let fun = |x: &[Vec<f64>]| {
        Ok::<_, String>(
            x.iter()
                .map(|p| vec![p[0], 1.0 - p[0] * p[0]])
                .collect::<Vec<_>>(),
        )
    };
    let result = Moo::builder()
        .xlimits(Bounds::new(vec![(0.0, 1.0)]).unwrap())
        .n_start(4)
        .n_iter(1)
        .pop_size(8)
        .n_gen(3)
        .random_state(2)
        .build()
        .optimize(&fun)
        .unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert!(value.get("surrogates").is_none());

    let samples: SampleSet = serde_json::from_value(value["samples"].clone()).unwrap();
    assert_eq!(samples, result.samples);
}
