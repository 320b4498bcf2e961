use std::path::{Path, PathBuf};

use burn::prelude::Backend;

use crate::error::Error;
use crate::model::{Architecture, Model};
use crate::parameters::{Configurable, ParamDict, Parameters};
use crate::settings;

/// 1 つの PINN 実験。
///
/// パラメータを持ち、設定の保存と読み込み、ネットワークの構築を行います。
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub params: Parameters,
}

impl Experiment {
    /// 辞書から実験パラメータを構築します。
    pub fn new(param_dict: ParamDict) -> Result<Self, Error> {
        let params = Parameters::new(param_dict)?;
        tracing::debug!(
            equations = ?params.physics.equation_names(),
            data = %params.data.name,
            "experiment configured"
        );
        Ok(Self { params })
    }

    /// 保存済みの設定ディレクトリから実験を再構築します。
    pub fn load_from(dir: &Path) -> Result<Self, Error> {
        Self::new(Self::load_setting(dir)?)
    }

    /// 元の辞書を `dir/params.json` に保存します。
    pub fn save_setting(&self, dir: &Path) -> Result<PathBuf, Error> {
        settings::save_setting(self.params.param_dict(), dir)
    }

    /// `dir/params.json` に保存された元の辞書を読み込みます。
    pub fn load_setting(dir: &Path) -> Result<ParamDict, Error> {
        settings::load_setting(dir)
    }

    /// 辞書を追加してパラメータを再構築します。
    pub fn update_parameters(&mut self, param_dict: ParamDict) -> Result<(), Error> {
        if param_dict.is_empty() {
            return Ok(());
        }
        let keys: Vec<&str> = param_dict.keys().map(String::as_str).collect();
        tracing::info!(?keys, "updating parameters");
        self.params.update_parameters(param_dict)?;
        Ok(())
    }

    /// nn パラメータからネットワーク構造を求めます。
    pub fn architecture(&self) -> Result<Architecture, Error> {
        Architecture::from_parameter(&self.params.nn)
    }

    /// nn パラメータに従って未学習のモデルを構築します。
    pub fn build_model<B: Backend>(&self, device: &B::Device) -> Result<Model<B>, Error> {
        let architecture = self.architecture()?;
        tracing::info!(
            layers = ?architecture.layer_dims(),
            activation = ?architecture.activation,
            input_scaling = self.params.nn.is_input_scaling(),
            output_scaling = self.params.nn.is_output_scaling(),
            "building network"
        );
        Ok(Model::new(&architecture, device))
    }
}
