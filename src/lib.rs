//! # 氷床流動のための物理情報ニューラルネットワーク (PINN) 実験設定
//!
//! フラットな 1 つの辞書から、領域・データ・ネットワーク・物理・学習の各パラメータを
//! 構築し、整合性をチェックします。ネットワークの構築には `burn` フレームワークを使用します。

pub mod cli;
pub mod error;
pub mod experiment;
pub mod inference;
pub mod model;
pub mod parameters;
pub mod settings;

pub use error::{ConfigurationError, Error};
pub use experiment::Experiment;
pub use parameters::{Configurable, ParamDict, Parameters};

/// 実験設定を保存するファイル名
pub const SETTING_FILENAME: &str = "params.json";
