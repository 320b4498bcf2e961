use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

use super::{Configurable, ParamDict, display_value};
use crate::error::ConfigurationError;

/// ニューラルネットワークのパラメータ。
///
/// ネットワーク構造と、入出力のスケーリング範囲を持ちます。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NnParameter {
    #[serde(skip)]
    pub param_dict: ParamDict,
    pub input_size: Value,
    pub output_size: Value,
    /// 隠れ層のニューロン数（整数、または層ごとのリスト）
    pub num_neurons: Value,
    pub num_layers: Value,
    pub activation: Value,
    pub initializer: Value,
    pub input_lb: Value,
    pub input_ub: Value,
    pub output_lb: Value,
    pub output_ub: Value,
}

impl Default for NnParameter {
    fn default() -> Self {
        Self {
            param_dict: ParamDict::new(),
            input_size: json!(2),
            output_size: json!(0),
            num_neurons: json!(0),
            num_layers: json!(0),
            activation: json!("tanh"),
            initializer: json!("Glorot uniform"),
            input_lb: Value::Null,
            input_ub: Value::Null,
            output_lb: Value::Null,
            output_ub: Value::Null,
        }
    }
}

impl NnParameter {
    /// 隠れ層の最大数
    pub const MAX_HIDDEN_LAYERS: usize = 1024;

    /// 入力の上下限がどちらも与えられているか
    pub fn is_input_scaling(&self) -> bool {
        !self.input_lb.is_null() && !self.input_ub.is_null()
    }

    /// 出力の上下限がどちらも与えられているか
    pub fn is_output_scaling(&self) -> bool {
        !self.output_lb.is_null() && !self.output_ub.is_null()
    }

    /// 入力スケーリングの (下限, 上限)。
    ///
    /// スケーリングが無効、または数値として読めない場合は `None` です。
    /// スカラーの上下限は要素 1 つのベクトルになります。
    pub fn input_bounds(&self) -> Option<(Vec<f64>, Vec<f64>)> {
        if !self.is_input_scaling() {
            return None;
        }
        Some((numbers(&self.input_lb)?, numbers(&self.input_ub)?))
    }

    /// 隠れ層の幅。
    ///
    /// `num_neurons` がリストならそのまま各層の幅になり、層数はリストの長さです。
    /// 整数なら `num_layers` 回繰り返します。層数が `MAX_HIDDEN_LAYERS` を
    /// 超える場合は `None` です。
    pub fn hidden_layers(&self) -> Option<Vec<usize>> {
        match &self.num_neurons {
            Value::Array(widths) if widths.len() <= Self::MAX_HIDDEN_LAYERS => {
                widths.iter().map(as_usize).collect()
            }
            Value::Array(_) => None,
            width => {
                let width = as_usize(width)?;
                let layers = as_usize(&self.num_layers)?;
                if layers > Self::MAX_HIDDEN_LAYERS {
                    return None;
                }
                Some(vec![width; layers])
            }
        }
    }
}

pub(crate) fn as_usize(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|v| usize::try_from(v).ok())
}

fn numbers(value: &Value) -> Option<Vec<f64>> {
    match value {
        Value::Array(items) => items.iter().map(Value::as_f64).collect(),
        scalar => scalar.as_f64().map(|v| vec![v]),
    }
}

impl Configurable for NnParameter {
    const KIND: &'static str = "NnParameter";
    const FIELDS: &'static [&'static str] = &[
        "input_size",
        "output_size",
        "num_neurons",
        "num_layers",
        "activation",
        "initializer",
        "input_lb",
        "input_ub",
        "output_lb",
        "output_ub",
    ];

    fn param_dict(&self) -> &ParamDict {
        &self.param_dict
    }

    fn set_param_dict(&mut self, param_dict: ParamDict) {
        self.param_dict = param_dict;
    }

    fn set_field(&mut self, key: &str, value: Value) -> bool {
        let field = match key {
            "input_size" => &mut self.input_size,
            "output_size" => &mut self.output_size,
            "num_neurons" => &mut self.num_neurons,
            "num_layers" => &mut self.num_layers,
            "activation" => &mut self.activation,
            "initializer" => &mut self.initializer,
            "input_lb" => &mut self.input_lb,
            "input_ub" => &mut self.input_ub,
            "output_lb" => &mut self.output_lb,
            "output_ub" => &mut self.output_ub,
            _ => return false,
        };
        *field = value;
        true
    }

    fn field_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("input_size", display_value(&self.input_size)),
            ("output_size", display_value(&self.output_size)),
            ("num_neurons", display_value(&self.num_neurons)),
            ("num_layers", display_value(&self.num_layers)),
            ("activation", display_value(&self.activation)),
            ("initializer", display_value(&self.initializer)),
            ("input_lb", display_value(&self.input_lb)),
            ("input_ub", display_value(&self.input_ub)),
            ("output_lb", display_value(&self.output_lb)),
            ("output_ub", display_value(&self.output_ub)),
        ]
    }

    /// 既知のフィールドを上書きします。
    ///
    /// `num_neurons` がリストの場合、`num_layers` はリストの長さに揃えます。
    fn update(&mut self, param_dict: &ParamDict) -> Result<(), ConfigurationError> {
        for (key, value) in param_dict {
            if !self.set_field(key, value.clone()) {
                tracing::trace!(kind = Self::KIND, key = %key, "unknown key ignored");
            }
        }
        if let Value::Array(widths) = &self.num_neurons {
            self.num_layers = json!(widths.len());
        }
        Ok(())
    }

    fn check_consistency(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

impl fmt::Display for NnParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nn(value: Value) -> NnParameter {
        NnParameter::new(value.as_object().cloned().unwrap()).unwrap()
    }

    #[test]
    fn test_output_scaling_needs_both_bounds() {
        assert!(!nn(json!({"output_ub": [1.0]})).is_output_scaling());
        assert!(nn(json!({"output_lb": [-1.0], "output_ub": [1.0]})).is_output_scaling());
    }

    #[test]
    fn test_input_bounds() {
        let param = nn(json!({"input_lb": [0.0, -5], "input_ub": [10.0, 5]}));
        assert_eq!(param.input_bounds(), Some((vec![0.0, -5.0], vec![10.0, 5.0])));

        let scalar = nn(json!({"input_lb": 0, "input_ub": 1}));
        assert_eq!(scalar.input_bounds(), Some((vec![0.0], vec![1.0])));

        assert_eq!(nn(json!({"input_lb": [0.0]})).input_bounds(), None);
        assert_eq!(nn(json!({"input_lb": ["a"], "input_ub": [1]})).input_bounds(), None);
    }

    #[test]
    fn test_hidden_layers_from_width_and_depth() {
        let param = nn(json!({"num_neurons": 10, "num_layers": 4}));
        assert_eq!(param.hidden_layers(), Some(vec![10; 4]));
    }

    #[test]
    fn test_hidden_layers_from_list() {
        let param = nn(json!({"num_neurons": [4, 10], "num_layers": 7}));
        assert_eq!(param.hidden_layers(), Some(vec![4, 10]));
    }

    #[test]
    fn test_num_layers_follows_neuron_list() {
        let param = nn(json!({"num_neurons": [4, 10], "num_layers": 4, "output_size": 5}));
        assert_eq!(param.num_layers, json!(2));
        assert!(param.render().contains("\n\tnum_layers:\t2"));
        assert_eq!(param.param_dict["num_layers"], json!(4));

        let scalar = nn(json!({"num_neurons": 20, "num_layers": 4}));
        assert_eq!(scalar.num_layers, json!(4));
    }

    #[test]
    fn test_hidden_layers_rejects_excessive_depth() {
        let param = nn(json!({"num_neurons": 4, "num_layers": 1u64 << 62}));
        assert_eq!(param.hidden_layers(), None);

        let limit = NnParameter::MAX_HIDDEN_LAYERS;
        let param = nn(json!({"num_neurons": 4, "num_layers": limit}));
        assert_eq!(param.hidden_layers().map(|widths| widths.len()), Some(limit));
    }

    #[test]
    fn test_hidden_layers_rejects_non_integers() {
        assert_eq!(nn(json!({"num_neurons": "wide"})).hidden_layers(), None);
        assert_eq!(nn(json!({"num_neurons": [4, -1]})).hidden_layers(), None);
    }

    #[test]
    fn test_render_lists_every_field() {
        let rendered = NnParameter::default().render();
        assert!(rendered.starts_with("class of NnParameter:"));
        assert!(rendered.contains("\n\tactivation:\ttanh"));
        assert!(rendered.contains("\n\tinitializer:\tGlorot uniform"));
        assert!(rendered.contains("\n\tinput_lb:\tnull"));
        assert_eq!(rendered.lines().count(), 1 + NnParameter::FIELDS.len());
    }
}
