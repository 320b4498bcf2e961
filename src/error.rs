use std::path::PathBuf;

use thiserror::Error;

/// パラメータの整合性チェックに失敗したときのエラー。
///
/// 構築時（デフォルト値の設定と更新の後）にのみ返されます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// データ名の数とデータサイズの数が一致しない
    #[error("データ名の数 ({names}) とデータサイズの数 ({sizes}) が一致しません")]
    LengthMismatch { names: usize, sizes: usize },

    /// 長さを持たない値がフィールドに設定されている
    #[error("フィールド '{field}' の値 {value} は長さを持ちません")]
    Unsized { field: &'static str, value: String },
}

/// 設定ファイルの読み書き、モデル構築、CLI で発生するエラー。
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("I/O エラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON エラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML エラー: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("設定ファイル '{}' が見つかりません", .0.display())]
    SettingNotFound(PathBuf),

    /// nn パラメータからネットワークを構成できない
    #[error("ネットワーク構成が不正です: {0}")]
    Architecture(String),

    /// 推論の格子点数が上限を超える
    #[error("格子点数 {resolution}^{input_size} が上限 ({limit}) を超えます")]
    GridTooLarge {
        resolution: usize,
        input_size: usize,
        limit: usize,
    },

    #[error("上書き指定が不正です: {0}")]
    InvalidOverride(String),
}
