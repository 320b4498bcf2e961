use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{
    Configurable, DataParameter, DomainParameter, NnParameter, ParamDict, PhysicsParameter,
    TrainingParameter,
};
use crate::error::ConfigurationError;

/// PINN 実験全体のパラメータ。
///
/// 領域、データ、ネットワーク、物理、学習の各パラメータを持ちます。
/// 入力はフラットな 1 つの辞書で、各パラメータは同じ辞書から自分の知っている
/// キーだけを取り出して構築されます。名前空間はなく、複数の種類が同じキーを
/// 持つ場合はそれぞれが独立に同じ値を使います（衝突は検出しません）。
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Parameters {
    #[serde(skip)]
    pub param_dict: ParamDict,
    pub domain: DomainParameter,
    pub data: DataParameter,
    pub nn: NnParameter,
    pub physics: PhysicsParameter,
    pub training: TrainingParameter,
}

impl Parameters {
    /// 新しいキーを元の辞書に追加（既存のキーは上書き）し、全体を再構築します。
    ///
    /// 再構築時に整合性チェックが再実行されます。失敗した場合 `self` は変更されません。
    pub fn update_parameters(&mut self, param_dict: ParamDict) -> Result<(), ConfigurationError> {
        let mut merged = self.param_dict.clone();
        merged.extend(param_dict);
        *self = Self::new(merged)?;
        Ok(())
    }

    /// サブパラメータ間の整合性。
    // nn の入力数と physics の独立変数の数、出力数と変数の数の対応はまだ検査しない。
    fn check_coherence(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

impl Configurable for Parameters {
    const KIND: &'static str = "Parameters";
    const FIELDS: &'static [&'static str] = &["domain", "data", "nn", "physics", "training"];

    fn param_dict(&self) -> &ParamDict {
        &self.param_dict
    }

    fn set_param_dict(&mut self, param_dict: ParamDict) {
        self.param_dict = param_dict;
    }

    fn set_field(&mut self, _key: &str, _value: Value) -> bool {
        false
    }

    /// 各サブパラメータを同じ辞書から構築し直します。
    fn update(&mut self, param_dict: &ParamDict) -> Result<(), ConfigurationError> {
        self.domain = DomainParameter::new(param_dict.clone())?;
        self.data = DataParameter::new(param_dict.clone())?;
        self.nn = NnParameter::new(param_dict.clone())?;
        self.physics = PhysicsParameter::new(param_dict.clone())?;
        self.training = TrainingParameter::new(param_dict.clone())?;
        Ok(())
    }

    fn field_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("domain", self.domain.render()),
            ("data", self.data.render()),
            ("nn", self.nn.render()),
            ("physics", self.physics.render()),
            ("training", self.training.render()),
        ]
    }

    fn check_consistency(&self) -> Result<(), ConfigurationError> {
        self.check_coherence()
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
