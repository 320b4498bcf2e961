use std::time::Instant;

use burn::backend::NdArray;
use burn::module::Module;
use burn::tensor::Tensor;

use crate::error::Error;
use crate::experiment::Experiment;

type MyBackend = NdArray<f32>;

/// 入力スケーリングがない場合の評価範囲
const DEFAULT_BOUNDS: (f64, f64) = (-1.0, 1.0);

/// 推論する格子点数の上限
pub const MAX_GRID_POINTS: usize = 1 << 20;

/// `infer`サブコマンドを実行します。
///
/// 実験の nn パラメータからモデルを構築し、入力範囲の格子点で推論します。
pub fn run(experiment: &Experiment, resolution: usize) -> Result<(), Error> {
    let device = Default::default();
    let resolution = resolution.max(2);

    let model = experiment.build_model::<MyBackend>(&device)?;
    let input_size = experiment.architecture()?.input_size;
    let n_points = grid_size(resolution, input_size)?;
    let (lower, upper) = evaluation_bounds(experiment, input_size)?;

    println!("\n推論を実行します - バックエンド: NdArray (CPU)");
    println!(
        "=> ネットワーク: 線形層 {} 層, パラメータ数 {}",
        model.depth(),
        model.num_params()
    );
    let inference_start = Instant::now();

    let coords = sample_grid(&lower, &upper, resolution);
    let infer_coords_1d = Tensor::<MyBackend, 1>::from_floats(coords.as_slice(), &device);
    let infer_coords = infer_coords_1d.reshape([n_points, input_size]);
    let predictions = model.forward(infer_coords);
    let inference_duration = inference_start.elapsed();

    println!(
        "推論が完了しました。入力格子点数: {}^{}={}, 出力テンソルの形状: {:?}",
        resolution,
        input_size,
        n_points,
        predictions.dims()
    );
    println!("=> 推論時間: {:.2?}", inference_duration);

    Ok(())
}

/// 入力スケーリングが設定されていればその範囲、なければ各軸 [-1, 1] を返します。
fn evaluation_bounds(
    experiment: &Experiment,
    input_size: usize,
) -> Result<(Vec<f64>, Vec<f64>), Error> {
    let nn = &experiment.params.nn;
    if !nn.is_input_scaling() {
        return Ok((
            vec![DEFAULT_BOUNDS.0; input_size],
            vec![DEFAULT_BOUNDS.1; input_size],
        ));
    }
    let (lower, upper) = nn.input_bounds().ok_or_else(|| {
        Error::Architecture(format!(
            "input_lb ({}) と input_ub ({}) は数値でなければなりません",
            nn.input_lb, nn.input_ub
        ))
    })?;
    if lower.len() != input_size || upper.len() != input_size {
        return Err(Error::Architecture(format!(
            "入力範囲の次元 ({}, {}) が input_size ({}) と一致しません",
            lower.len(),
            upper.len(),
            input_size
        )));
    }
    Ok((lower, upper))
}

/// 格子点数 `resolution^input_size`。上限を超える場合はエラーです。
fn grid_size(resolution: usize, input_size: usize) -> Result<usize, Error> {
    u32::try_from(input_size)
        .ok()
        .and_then(|exp| resolution.checked_pow(exp))
        .filter(|&n| n <= MAX_GRID_POINTS)
        .ok_or(Error::GridTooLarge {
            resolution,
            input_size,
            limit: MAX_GRID_POINTS,
        })
}

/// 各軸を `resolution` 等分した格子点を行優先で平坦化して返します。
///
/// 最後の軸が最も速く変化します。点数は `grid_size` で確認済みであること。
fn sample_grid(lower: &[f64], upper: &[f64], resolution: usize) -> Vec<f32> {
    let steps = resolution.saturating_sub(1).max(1) as f64;
    let axes: Vec<Vec<f32>> = lower
        .iter()
        .zip(upper)
        .map(|(&lb, &ub)| {
            (0..resolution)
                .map(|i| (lb + (ub - lb) * i as f64 / steps) as f32)
                .collect()
        })
        .collect();

    let mut points: Vec<Vec<f32>> = vec![Vec::new()];
    for axis in &axes {
        points = points
            .iter()
            .flat_map(|prefix| {
                axis.iter().map(move |&value| {
                    let mut point = prefix.clone();
                    point.push(value);
                    point
                })
            })
            .collect();
    }
    points.into_iter().flatten().collect()
}
