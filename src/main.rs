//! # PINN 実験設定ツール
//!
//! 設定ファイル（JSON または TOML）から氷床流動 PINN 実験のパラメータを構築し、
//! 表示・チェック・保存を行います。`infer` ではパラメータからネットワークを構築し、
//! 格子点で推論を実行します。
//!
//! ## 使い方
//!
//! ```bash
//! cargo run --release -- show hp.toml --set num_layers=6
//! cargo run --release -- check hp.toml
//! cargo run --release -- save hp.toml --output runs/helheim
//! cargo run --release -- infer runs/helheim --resolution 50
//! ```

use std::path::Path;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pinn_ice::cli::{Cli, Commands, SettingArgs};
use pinn_ice::{Configurable, Error, inference};

/// `show`サブコマンドを実行します。
fn run_show(setting: &SettingArgs, json: bool) -> Result<(), Error> {
    let experiment = setting.load()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&experiment.params)?);
    } else {
        println!("{}", experiment.params);
    }
    Ok(())
}

/// `check`サブコマンドを実行します。
fn run_check(setting: &SettingArgs) -> Result<(), Error> {
    let experiment = setting.load()?;
    println!(
        "パラメータは整合しています ({} 個のキー)",
        experiment.params.param_dict().len()
    );
    Ok(())
}

/// `save`サブコマンドを実行します。
fn run_save(setting: &SettingArgs, output: &Path) -> Result<(), Error> {
    let experiment = setting.load()?;
    let path = experiment.save_setting(output)?;
    println!("=> 設定を '{}' に保存しました。", path.display());
    Ok(())
}

/// プログラムのエントリーポイント。
///
/// コマンドライン引数を解析し、各サブコマンドの処理に振り分けます。
fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinn_ice=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Show { setting, json } => run_show(setting, *json),
        Commands::Check { setting } => run_check(setting),
        Commands::Save { setting, output } => run_save(setting, output),
        Commands::Infer {
            setting,
            resolution,
        } => setting
            .load()
            .and_then(|experiment| inference::run(&experiment, *resolution)),
    };

    if let Err(e) = result {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}
