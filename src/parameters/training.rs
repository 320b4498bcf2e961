use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

use super::{Configurable, ParamDict, display_value};
use crate::error::ConfigurationError;

/// 学習のパラメータ。学習ループそのものは外部のフレームワークが担います。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingParameter {
    #[serde(skip)]
    pub param_dict: ParamDict,
    pub epochs: Value,
    pub learning_rate: Value,
    pub loss_weights: Value,
    pub loss_functions: Value,
    pub is_save: Value,
    pub save_path: Value,
    pub checkpoint: Value,
    // early stopping
    pub min_delta: Value,
    pub patience: Value,
    pub period: Value,
}

impl Default for TrainingParameter {
    fn default() -> Self {
        Self {
            param_dict: ParamDict::new(),
            epochs: json!(0),
            learning_rate: json!(0.001),
            loss_weights: json!([]),
            loss_functions: json!("MSE"),
            is_save: json!(true),
            save_path: json!("./"),
            checkpoint: json!(false),
            min_delta: Value::Null,
            patience: Value::Null,
            period: Value::Null,
        }
    }
}

impl Configurable for TrainingParameter {
    const KIND: &'static str = "TrainingParameter";
    const FIELDS: &'static [&'static str] = &[
        "epochs",
        "learning_rate",
        "loss_weights",
        "loss_functions",
        "is_save",
        "save_path",
        "checkpoint",
        "min_delta",
        "patience",
        "period",
    ];

    fn param_dict(&self) -> &ParamDict {
        &self.param_dict
    }

    fn set_param_dict(&mut self, param_dict: ParamDict) {
        self.param_dict = param_dict;
    }

    fn set_field(&mut self, key: &str, value: Value) -> bool {
        let field = match key {
            "epochs" => &mut self.epochs,
            "learning_rate" => &mut self.learning_rate,
            "loss_weights" => &mut self.loss_weights,
            "loss_functions" => &mut self.loss_functions,
            "is_save" => &mut self.is_save,
            "save_path" => &mut self.save_path,
            "checkpoint" => &mut self.checkpoint,
            "min_delta" => &mut self.min_delta,
            "patience" => &mut self.patience,
            "period" => &mut self.period,
            _ => return false,
        };
        *field = value;
        true
    }

    fn field_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("epochs", display_value(&self.epochs)),
            ("learning_rate", display_value(&self.learning_rate)),
            ("loss_weights", display_value(&self.loss_weights)),
            ("loss_functions", display_value(&self.loss_functions)),
            ("is_save", display_value(&self.is_save)),
            ("save_path", display_value(&self.save_path)),
            ("checkpoint", display_value(&self.checkpoint)),
            ("min_delta", display_value(&self.min_delta)),
            ("patience", display_value(&self.patience)),
            ("period", display_value(&self.period)),
        ]
    }

    fn check_consistency(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

impl fmt::Display for TrainingParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
