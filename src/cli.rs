use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::error::Error;
use crate::experiment::Experiment;
use crate::parameters::ParamDict;
use crate::settings;

/// clapでコマンドラインの構造を定義します。
#[derive(Parser, Debug)]
#[command(author, version, about = "Configure physics-informed neural network experiments for ice-sheet flow", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 実行するサブコマンドを定義します。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 実験パラメータを表示します
    Show {
        #[command(flatten)]
        setting: SettingArgs,
        /// 各フィールドの値を JSON で出力します
        #[arg(long)]
        json: bool,
    },
    /// 実験パラメータの整合性をチェックします
    Check {
        #[command(flatten)]
        setting: SettingArgs,
    },
    /// 上書きを適用した設定を params.json として保存します
    Save {
        #[command(flatten)]
        setting: SettingArgs,
        /// 保存先のディレクトリ
        #[arg(short, long)]
        output: PathBuf,
    },
    /// nn パラメータからモデルを構築し、推論を実行します
    Infer {
        #[command(flatten)]
        setting: SettingArgs,
        /// 各軸の格子点数
        #[arg(short, long, default_value_t = 50)]
        resolution: usize,
    },
}

/// 設定ファイルと上書き指定
#[derive(Args, Debug)]
pub struct SettingArgs {
    /// 設定ファイル（JSON, TOML）または params.json を含むディレクトリ
    pub path: PathBuf,
    /// パラメータを上書きします（値は JSON として解釈し、失敗したら文字列）
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

impl SettingArgs {
    /// 設定ファイルを読み込み、上書きを適用した実験を返します。
    pub fn load(&self) -> Result<Experiment, Error> {
        let mut experiment = Experiment::new(settings::read_param_dict(&self.path)?)?;
        experiment.update_parameters(parse_overrides(&self.overrides)?)?;
        Ok(experiment)
    }
}

/// `KEY=VALUE` の並びを辞書にします。
pub fn parse_overrides(overrides: &[String]) -> Result<ParamDict, Error> {
    let mut dict = ParamDict::new();
    for entry in overrides {
        let (key, raw) = entry
            .split_once('=')
            .ok_or_else(|| Error::InvalidOverride(format!("'=' がありません: {entry}")))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidOverride(format!("キーが空です: {entry}")));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        if dict.insert(key.to_owned(), value).is_some() {
            tracing::warn!(key, "override given more than once, last one wins");
        }
    }
    Ok(dict)
}
