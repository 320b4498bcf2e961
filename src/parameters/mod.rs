//! # 実験パラメータ
//!
//! PINN 実験の設定を、種類ごとのパラメータ構造体として表現します。
//! どの構造体も同じ手順で構築されます。
//!
//! 1. 入力の辞書 (`param_dict`) をそのまま保持する
//! 2. デフォルト値を設定する（これがフィールドの全集合になる）
//! 3. 辞書のうち既知のフィールド名に一致するキーだけで値を上書きする
//! 4. 整合性をチェックする（失敗すると構築そのものが失敗する）
//!
//! 保持した辞書は保存と再読み込みの単位になります。同じ辞書から構築すれば
//! 同じパラメータが得られます。

mod aggregate;
mod data;
mod domain;
mod nn;
mod physics;
mod training;

pub use aggregate::Parameters;
pub use data::DataParameter;
pub use domain::DomainParameter;
pub use nn::NnParameter;
pub use physics::PhysicsParameter;
pub use training::TrainingParameter;

pub(crate) use nn::as_usize;

use serde_json::{Map, Value};

use crate::error::ConfigurationError;

/// 型を持たない入力辞書。キーはフィールド名、値は任意の JSON 値です。
pub type ParamDict = Map<String, Value>;

/// 自己検証するパラメータ構造体の共通インターフェース。
///
/// `Default` の実装がデフォルト値の設定にあたり、フィールドの語彙を決めます。
pub trait Configurable: Default {
    /// 表示に使う種類名
    const KIND: &'static str;
    /// この種類が持つフィールド名の一覧
    const FIELDS: &'static [&'static str];

    /// 構築に使われた元の辞書
    fn param_dict(&self) -> &ParamDict;

    /// 元の辞書を置き換えます。フィールドの値は変わりません。
    fn set_param_dict(&mut self, param_dict: ParamDict);

    /// `key` が既知のフィールドなら値を上書きして `true` を返します。
    fn set_field(&mut self, key: &str, value: Value) -> bool;

    /// 表示用の (フィールド名, 値) の一覧
    fn field_entries(&self) -> Vec<(&'static str, String)>;

    /// 種類ごとの整合性チェック
    fn check_consistency(&self) -> Result<(), ConfigurationError>;

    /// 辞書のうち既知のフィールドだけを上書きします。未知のキーは無視されます。
    fn update(&mut self, param_dict: &ParamDict) -> Result<(), ConfigurationError> {
        for (key, value) in param_dict {
            if !self.set_field(key, value.clone()) {
                tracing::trace!(kind = Self::KIND, key = %key, "unknown key ignored");
            }
        }
        Ok(())
    }

    /// 辞書からパラメータを構築します。
    ///
    /// デフォルト値 → 上書き → 整合性チェックの順に適用し、
    /// チェックに失敗した場合はオブジェクトを返しません。
    fn new(param_dict: ParamDict) -> Result<Self, ConfigurationError> {
        let mut config = Self::default();
        config.update(&param_dict)?;
        config.set_param_dict(param_dict);
        config.check_consistency()?;
        tracing::debug!(kind = Self::KIND, "parameters constructed");
        Ok(config)
    }

    fn is_field(name: &str) -> bool {
        Self::FIELDS.iter().any(|field| *field == name)
    }

    /// `keys`（名前のリストまたは辞書）のすべてがフィールドなら `true` を返します。
    ///
    /// リストでも辞書でもない値、文字列以外を含むリストには `false` を返します。
    fn has_keys(&self, keys: &Value) -> bool {
        match keys {
            Value::Array(names) => names
                .iter()
                .all(|name| name.as_str().is_some_and(Self::is_field)),
            Value::Object(map) => map.keys().all(|name| Self::is_field(name)),
            _ => false,
        }
    }

    /// 元の辞書を除いた全フィールドを 1 行ずつ表示用に整形します。
    fn render(&self) -> String {
        let mut out = format!("class of {}:", Self::KIND);
        for (field, value) in self.field_entries() {
            out.push_str("\n\t");
            out.push_str(field);
            out.push_str(":\t");
            out.push_str(&value.replace('\n', "\n\t"));
        }
        out
    }
}

/// 文字列はそのまま、それ以外は JSON として表示します。
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// リストと辞書は要素数、文字列は文字数。それ以外は長さを持ちません。
pub(crate) fn value_len(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        Value::String(s) => Some(s.chars().count()),
        _ => None,
    }
}
