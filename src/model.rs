use std::f64::consts::SQRT_2;
use std::str::FromStr;

use burn::module::{Ignored, Module};
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::prelude::Backend;
use burn::tensor::Tensor;
use burn::tensor::activation;

use crate::error::Error;
use crate::parameters::{NnParameter, as_usize};

/// 構築できるネットワークのパラメータ数の上限
pub const MAX_PARAMS: usize = 1 << 26;

/// 隠れ層の活性化関数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Tanh,
    Relu,
    Sigmoid,
    Gelu,
    Silu,
}

impl Activation {
    /// テンソルの各要素に活性化関数を適用します。
    pub fn apply<B: Backend, const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            Activation::Tanh => activation::tanh(x),
            Activation::Relu => activation::relu(x),
            Activation::Sigmoid => activation::sigmoid(x),
            Activation::Gelu => activation::gelu(x),
            Activation::Silu => activation::silu(x),
        }
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tanh" => Ok(Activation::Tanh),
            "relu" => Ok(Activation::Relu),
            "sigmoid" => Ok(Activation::Sigmoid),
            "gelu" => Ok(Activation::Gelu),
            "silu" | "swish" => Ok(Activation::Silu),
            other => Err(Error::Architecture(format!("未対応の活性化関数です: {other}"))),
        }
    }
}

/// 重みの初期化方法。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerKind {
    GlorotUniform,
    GlorotNormal,
    HeUniform,
    HeNormal,
    Zeros,
}

impl InitializerKind {
    fn to_burn(self) -> Initializer {
        match self {
            InitializerKind::GlorotUniform => Initializer::XavierUniform { gain: 1.0 },
            InitializerKind::GlorotNormal => Initializer::XavierNormal { gain: 1.0 },
            InitializerKind::HeUniform => Initializer::KaimingUniform {
                gain: SQRT_2,
                fan_out_only: false,
            },
            InitializerKind::HeNormal => Initializer::KaimingNormal {
                gain: SQRT_2,
                fan_out_only: false,
            },
            InitializerKind::Zeros => Initializer::Zeros,
        }
    }
}

impl FromStr for InitializerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "glorot uniform" | "xavier uniform" => Ok(InitializerKind::GlorotUniform),
            "glorot normal" | "xavier normal" => Ok(InitializerKind::GlorotNormal),
            "he uniform" => Ok(InitializerKind::HeUniform),
            "he normal" => Ok(InitializerKind::HeNormal),
            "zeros" => Ok(InitializerKind::Zeros),
            other => Err(Error::Architecture(format!("未対応の初期化方法です: {other}"))),
        }
    }
}

/// nn パラメータから決まるネットワーク構造。
#[derive(Debug, Clone, PartialEq)]
pub struct Architecture {
    pub input_size: usize,
    pub output_size: usize,
    pub hidden: Vec<usize>,
    pub activation: Activation,
    pub initializer: InitializerKind,
}

impl Architecture {
    /// nn パラメータを解釈します。
    ///
    /// 入出力の次元と各隠れ層の幅は正の整数でなければなりません。
    pub fn from_parameter(nn: &NnParameter) -> Result<Self, Error> {
        let input_size = positive(&nn.input_size, "input_size")?;
        let output_size = positive(&nn.output_size, "output_size")?;
        if !nn.num_neurons.is_array()
            && as_usize(&nn.num_layers).is_some_and(|n| n > NnParameter::MAX_HIDDEN_LAYERS)
        {
            return Err(Error::Architecture(format!(
                "num_layers ({}) は {} 以下でなければなりません",
                nn.num_layers,
                NnParameter::MAX_HIDDEN_LAYERS
            )));
        }
        let hidden = nn.hidden_layers().ok_or_else(|| {
            Error::Architecture(format!(
                "num_neurons ({}) と num_layers ({}) から隠れ層を決められません",
                nn.num_neurons, nn.num_layers
            ))
        })?;
        if hidden.is_empty() || hidden.contains(&0) {
            return Err(Error::Architecture(format!(
                "隠れ層の幅は 1 以上でなければなりません: {hidden:?}"
            )));
        }
        let activation: Activation = name(&nn.activation, "activation")?.parse()?;
        let initializer: InitializerKind = name(&nn.initializer, "initializer")?.parse()?;

        let architecture = Self {
            input_size,
            output_size,
            hidden,
            activation,
            initializer,
        };
        match architecture.num_params() {
            Some(n) if n <= MAX_PARAMS => Ok(architecture),
            _ => Err(Error::Architecture(format!(
                "パラメータ数が上限 ({MAX_PARAMS}) を超えます: {:?}",
                architecture.layer_dims()
            ))),
        }
    }

    /// 重みとバイアスの総数。オーバーフローする場合は `None` です。
    pub fn num_params(&self) -> Option<usize> {
        self.layer_dims()
            .into_iter()
            .try_fold(0usize, |total, (d_input, d_output)| {
                d_input
                    .checked_mul(d_output)?
                    .checked_add(d_output)?
                    .checked_add(total)
            })
    }

    /// 各線形層の (入力, 出力) 次元
    pub fn layer_dims(&self) -> Vec<(usize, usize)> {
        let mut widths = Vec::with_capacity(self.hidden.len() + 2);
        widths.push(self.input_size);
        widths.extend_from_slice(&self.hidden);
        widths.push(self.output_size);
        widths.windows(2).map(|pair| (pair[0], pair[1])).collect()
    }
}

fn positive(value: &serde_json::Value, field: &str) -> Result<usize, Error> {
    match as_usize(value) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(Error::Architecture(format!(
            "{field} は正の整数でなければなりません: {value}"
        ))),
    }
}

fn name<'a>(value: &'a serde_json::Value, field: &str) -> Result<&'a str, Error> {
    value
        .as_str()
        .ok_or_else(|| Error::Architecture(format!("{field} は文字列でなければなりません: {value}")))
}

/// PINNの本体となるニューラルネットワークモデル。
///
/// 独立変数（座標）を入力とし、その点における物理量を予測する多層パーセプトロン（MLP）です。
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    linears: Vec<Linear<B>>,
    activation: Ignored<Activation>,
}

impl<B: Backend> Model<B> {
    /// ネットワーク構造に従って新しいモデルを初期化します。
    pub fn new(architecture: &Architecture, device: &B::Device) -> Self {
        let initializer = architecture.initializer.to_burn();
        let linears = architecture
            .layer_dims()
            .into_iter()
            .map(|(d_input, d_output)| {
                LinearConfig::new(d_input, d_output)
                    .with_initializer(initializer.clone())
                    .init(device)
            })
            .collect();
        Self {
            linears,
            activation: Ignored(architecture.activation),
        }
    }

    /// 線形層の数
    pub fn depth(&self) -> usize {
        self.linears.len()
    }

    /// モデルの順伝播を実行します。最終層には活性化関数を適用しません。
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let last = self.linears.len().saturating_sub(1);
        let mut x = input;
        for (i, linear) in self.linears.iter().enumerate() {
            x = linear.forward(x);
            if i < last {
                x = self.activation.apply(x);
            }
        }
        x
    }
}
