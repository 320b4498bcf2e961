//! 実験設定（元の辞書）の保存と読み込み。
//!
//! 保存形式は `params.json` です。読み込みは JSON と TOML に対応します。

use std::fs;
use std::path::{Path, PathBuf};

use crate::SETTING_FILENAME;
use crate::error::Error;
use crate::parameters::ParamDict;

/// 辞書を `dir/params.json` に書き出し、書き出したパスを返します。
pub fn save_setting(param_dict: &ParamDict, dir: &Path) -> Result<PathBuf, Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(SETTING_FILENAME);
    let contents = serde_json::to_string_pretty(param_dict)?;
    fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), keys = param_dict.len(), "setting saved");
    Ok(path)
}

/// `dir/params.json` から辞書を読み込みます。
pub fn load_setting(dir: &Path) -> Result<ParamDict, Error> {
    read_json(&dir.join(SETTING_FILENAME))
}

/// 設定ファイルを読み込みます。
///
/// ディレクトリならその中の `params.json`、拡張子が `.toml` なら TOML、
/// それ以外は JSON として読みます。
pub fn read_param_dict(path: &Path) -> Result<ParamDict, Error> {
    if path.is_dir() {
        return load_setting(path);
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => read_toml(path),
        _ => read_json(path),
    }
}

fn read_to_string(path: &Path) -> Result<String, Error> {
    if !path.exists() {
        return Err(Error::SettingNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "setting loaded");
    Ok(contents)
}

fn read_json(path: &Path) -> Result<ParamDict, Error> {
    Ok(serde_json::from_str(&read_to_string(path)?)?)
}

fn read_toml(path: &Path) -> Result<ParamDict, Error> {
    Ok(toml::from_str(&read_to_string(path)?)?)
}
