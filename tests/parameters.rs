use pinn_ice::parameters::{
    DataParameter, DomainParameter, NnParameter, PhysicsParameter, TrainingParameter,
};
use pinn_ice::{ConfigurationError, Configurable, ParamDict, Parameters};
use serde_json::{Value, json};

fn dict(value: Value) -> ParamDict {
    value.as_object().cloned().unwrap()
}

fn assert_defaults<T: Configurable>(fields: Value) {
    let config = T::new(ParamDict::new()).unwrap();
    assert!(config.has_keys(&fields), "{} is missing {fields}", T::KIND);
    assert_eq!(fields.as_array().unwrap().len(), T::FIELDS.len());
    assert!(config.param_dict().is_empty());
}

#[test]
fn test_every_kind_constructs_from_empty_mapping() {
    assert_defaults::<DomainParameter>(json!(["shapefile"]));
    assert_defaults::<DataParameter>(json!(["name", "size"]));
    assert_defaults::<NnParameter>(json!([
        "input_size",
        "output_size",
        "num_neurons",
        "num_layers",
        "activation",
        "initializer",
        "input_lb",
        "input_ub",
        "output_lb",
        "output_ub"
    ]));
    assert_defaults::<PhysicsParameter>(json!(["equations", "dependent", "variables"]));
    assert_defaults::<TrainingParameter>(json!([
        "epochs",
        "learning_rate",
        "loss_weights",
        "loss_functions",
        "is_save",
        "save_path",
        "checkpoint",
        "min_delta",
        "patience",
        "period"
    ]));
    assert_defaults::<Parameters>(json!(["domain", "data", "nn", "physics", "training"]));
}

#[test]
fn test_default_values() {
    let domain = DomainParameter::default();
    assert!(domain.shapefile.is_null());

    let data = DataParameter::default();
    assert_eq!(data.name, json!([]));
    assert_eq!(data.size, json!([]));

    let nn = NnParameter::default();
    assert_eq!(nn.input_size, json!(2));
    assert_eq!(nn.output_size, json!(0));
    assert_eq!(nn.num_neurons, json!(0));
    assert_eq!(nn.num_layers, json!(0));
    assert_eq!(nn.activation, json!("tanh"));
    assert_eq!(nn.initializer, json!("Glorot uniform"));
    assert!(nn.input_lb.is_null());
    assert!(nn.input_ub.is_null());
    assert!(nn.output_lb.is_null());
    assert!(nn.output_ub.is_null());

    let physics = PhysicsParameter::default();
    assert_eq!(physics.equations, json!([]));
    assert_eq!(physics.dependent, json!(["x", "y"]));
    assert_eq!(physics.variables, json!([]));

    let training = TrainingParameter::default();
    assert_eq!(training.epochs, json!(0));
    assert_eq!(training.learning_rate, json!(0.001));
    assert_eq!(training.loss_weights, json!([]));
    assert_eq!(training.loss_functions, json!("MSE"));
    assert_eq!(training.is_save, json!(true));
    assert_eq!(training.save_path, json!("./"));
    assert_eq!(training.checkpoint, json!(false));
    assert!(training.min_delta.is_null());
    assert!(training.patience.is_null());
    assert!(training.period.is_null());

    let params = Parameters::default();
    assert_eq!(params.domain, domain);
    assert_eq!(params.data, data);
    assert_eq!(params.nn, nn);
    assert_eq!(params.physics, physics);
    assert_eq!(params.training, training);
}

#[test]
fn test_num_layers_matches_neuron_list() {
    let params = Parameters::new(dict(json!({
        "num_neurons": [4, 10],
        "num_layers": 4,
        "output_size": 5
    })))
    .unwrap();
    assert_eq!(params.nn.num_layers, json!(2));
    assert_eq!(params.nn.hidden_layers(), Some(vec![4, 10]));
}

#[test]
fn test_selective_update_ignores_unknown_keys() {
    let raw = dict(json!({"name": ["a", "b"], "size": [1, 2], "unknown_key": 99}));
    let data = DataParameter::new(raw.clone()).unwrap();
    assert_eq!(data.name, json!(["a", "b"]));
    assert_eq!(data.size, json!([1, 2]));
    assert!(!data.has_keys(&json!(["unknown_key"])));
    assert!(data.has_keys(&json!({"name": null, "size": 0})));
    assert_eq!(data.param_dict, raw);
}

#[test]
fn test_data_consistency() {
    let err = DataParameter::new(dict(json!({"name": ["a", "b"], "size": [1]}))).unwrap_err();
    assert!(matches!(err, ConfigurationError::LengthMismatch { names: 2, sizes: 1 }));
    assert!(DataParameter::new(dict(json!({"name": ["a"], "size": [1]}))).is_ok());
}

#[test]
fn test_rewrap_through_serialized_mapping() {
    let raw = dict(json!({
        "shapefile": "fastflow_CF.exp",
        "name": ["u", "v", "s", "H"],
        "size": [4000, 4000, 4000, 4000],
        "num_neurons": [4, 10],
        "input_lb": [0.0, 0.0],
        "input_ub": [1.0e5, 1.0e5],
        "equations": {"SSA": {"scalar_variables": {"B": 1.26802073401e8}}},
        "loss_weights": [1.0e-7, 1.0e-7, 1.0e-5],
        "epochs": 10
    }));
    let params = Parameters::new(raw).unwrap();

    let text = serde_json::to_string(params.param_dict()).unwrap();
    let reloaded = Parameters::new(serde_json::from_str(&text).unwrap()).unwrap();
    assert_eq!(params, reloaded);

    let nn = NnParameter::new(params.param_dict().clone()).unwrap();
    assert_eq!(nn, params.nn);
}

#[test]
fn test_aggregate_fan_out() {
    let params = Parameters::new(dict(json!({
        "shapefile": "f.shp",
        "name": ["u"],
        "size": [5],
        "num_layers": 3
    })))
    .unwrap();
    assert_eq!(params.domain.shapefile, json!("f.shp"));
    assert_eq!(params.data.name, json!(["u"]));
    assert_eq!(params.data.size, json!([5]));
    assert_eq!(params.nn.num_layers, json!(3));

    let defaults = PhysicsParameter::default();
    assert_eq!(params.physics.equations, defaults.equations);
    assert_eq!(params.physics.dependent, defaults.dependent);
    assert_eq!(params.physics.variables, defaults.variables);
}

#[test]
fn test_scaling_predicates() {
    let only_lower = NnParameter::new(dict(json!({"input_lb": [0.0, 0.0]}))).unwrap();
    assert!(!only_lower.is_input_scaling());
    assert!(!only_lower.is_output_scaling());

    let both = NnParameter::new(dict(json!({"input_lb": [0.0, 0.0], "input_ub": [1.0, 1.0]})))
        .unwrap();
    assert!(both.is_input_scaling());
}

#[test]
fn test_later_mutation_is_not_rechecked() {
    let mut data = DataParameter::new(ParamDict::new()).unwrap();
    data.name = json!(["u"]);
    assert_eq!(
        data.check_consistency(),
        Err(ConfigurationError::LengthMismatch { names: 1, sizes: 0 })
    );

    data.update(&dict(json!({"size": [100]}))).unwrap();
    assert!(data.check_consistency().is_ok());
}

#[test]
fn test_display() {
    let params = Parameters::new(dict(json!({"num_layers": 3}))).unwrap();
    let rendered = params.to_string();
    assert!(rendered.starts_with("class of Parameters:"));
    assert!(rendered.contains("\t\tnum_layers:\t3"));
    assert!(!rendered.contains("param_dict"));
}
