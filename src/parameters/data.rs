use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

use super::{Configurable, ParamDict, display_value, value_len};
use crate::error::ConfigurationError;

/// PINN で使う観測データのパラメータ。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataParameter {
    #[serde(skip)]
    pub param_dict: ParamDict,
    /// 使用するデータ名のリスト
    pub name: Value,
    /// 各データの使用点数
    pub size: Value,
}

impl Default for DataParameter {
    fn default() -> Self {
        Self {
            param_dict: ParamDict::new(),
            name: json!([]),
            size: json!([]),
        }
    }
}

impl Configurable for DataParameter {
    const KIND: &'static str = "DataParameter";
    const FIELDS: &'static [&'static str] = &["name", "size"];

    fn param_dict(&self) -> &ParamDict {
        &self.param_dict
    }

    fn set_param_dict(&mut self, param_dict: ParamDict) {
        self.param_dict = param_dict;
    }

    fn set_field(&mut self, key: &str, value: Value) -> bool {
        match key {
            "name" => self.name = value,
            "size" => self.size = value,
            _ => return false,
        }
        true
    }

    fn field_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", display_value(&self.name)),
            ("size", display_value(&self.size)),
        ]
    }

    /// `name` と `size` の長さが一致することを確認します。
    fn check_consistency(&self) -> Result<(), ConfigurationError> {
        let names = value_len(&self.name).ok_or_else(|| ConfigurationError::Unsized {
            field: "name",
            value: self.name.to_string(),
        })?;
        let sizes = value_len(&self.size).ok_or_else(|| ConfigurationError::Unsized {
            field: "size",
            value: self.size.to_string(),
        })?;
        if names != sizes {
            return Err(ConfigurationError::LengthMismatch { names, sizes });
        }
        Ok(())
    }
}

impl fmt::Display for DataParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
