use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{Configurable, ParamDict, display_value};
use crate::error::ConfigurationError;

/// 計算領域のパラメータ。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainParameter {
    #[serde(skip)]
    pub param_dict: ParamDict,
    /// 領域の外周を定義するシェープファイル
    pub shapefile: Value,
}

impl Default for DomainParameter {
    fn default() -> Self {
        Self {
            param_dict: ParamDict::new(),
            shapefile: Value::Null,
        }
    }
}

impl Configurable for DomainParameter {
    const KIND: &'static str = "DomainParameter";
    const FIELDS: &'static [&'static str] = &["shapefile"];

    fn param_dict(&self) -> &ParamDict {
        &self.param_dict
    }

    fn set_param_dict(&mut self, param_dict: ParamDict) {
        self.param_dict = param_dict;
    }

    fn set_field(&mut self, key: &str, value: Value) -> bool {
        match key {
            "shapefile" => self.shapefile = value,
            _ => return false,
        }
        true
    }

    fn field_entries(&self) -> Vec<(&'static str, String)> {
        vec![("shapefile", display_value(&self.shapefile))]
    }

    fn check_consistency(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

impl fmt::Display for DomainParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shapefile_defaults_to_null() {
        let domain = DomainParameter::new(ParamDict::new()).unwrap();
        assert!(domain.shapefile.is_null());
        assert!(domain.has_keys(&json!(["shapefile"])));
    }

    #[test]
    fn test_render() {
        let mut dict = ParamDict::new();
        dict.insert("shapefile".into(), json!("fastflow_CF.exp"));
        let domain = DomainParameter::new(dict).unwrap();
        assert_eq!(
            domain.to_string(),
            "class of DomainParameter:\n\tshapefile:\tfastflow_CF.exp"
        );
    }
}
