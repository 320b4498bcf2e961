use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

use super::{Configurable, ParamDict, display_value};
use crate::error::ConfigurationError;

/// 物理方程式のパラメータ。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicsParameter {
    #[serde(skip)]
    pub param_dict: ParamDict,
    /// 方程式の名前（リスト、または名前をキーとする辞書）
    pub equations: Value,
    /// 独立変数の名前
    pub dependent: Value,
    /// 方程式に現れる変数の名前
    pub variables: Value,
}

impl Default for PhysicsParameter {
    fn default() -> Self {
        Self {
            param_dict: ParamDict::new(),
            equations: json!([]),
            dependent: json!(["x", "y"]),
            variables: json!([]),
        }
    }
}

impl PhysicsParameter {
    /// 設定された方程式の名前。辞書の場合はキーの一覧です。
    pub fn equation_names(&self) -> Vec<String> {
        match &self.equations {
            Value::Array(names) => names
                .iter()
                .filter_map(|name| name.as_str().map(str::to_owned))
                .collect(),
            Value::Object(map) => map.keys().cloned().collect(),
            Value::String(name) => vec![name.clone()],
            _ => Vec::new(),
        }
    }
}

impl Configurable for PhysicsParameter {
    const KIND: &'static str = "PhysicsParameter";
    const FIELDS: &'static [&'static str] = &["equations", "dependent", "variables"];

    fn param_dict(&self) -> &ParamDict {
        &self.param_dict
    }

    fn set_param_dict(&mut self, param_dict: ParamDict) {
        self.param_dict = param_dict;
    }

    fn set_field(&mut self, key: &str, value: Value) -> bool {
        match key {
            "equations" => self.equations = value,
            "dependent" => self.dependent = value,
            "variables" => self.variables = value,
            _ => return false,
        }
        true
    }

    fn field_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("equations", display_value(&self.equations)),
            ("dependent", display_value(&self.dependent)),
            ("variables", display_value(&self.variables)),
        ]
    }

    fn check_consistency(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

impl fmt::Display for PhysicsParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equation_names() {
        let mut physics = PhysicsParameter::default();
        assert!(physics.equation_names().is_empty());

        physics.equations = json!({"SSA": {"scalar_variables": {"B": 1.26802073401e8}}});
        assert_eq!(physics.equation_names(), vec!["SSA".to_string()]);

        physics.equations = json!(["SSA", "MC"]);
        assert_eq!(physics.equation_names(), vec!["SSA".to_string(), "MC".to_string()]);
    }
}
