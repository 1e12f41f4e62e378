use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Network topology constants
pub const INPUT_COUNT: usize = 1; // scalar input
pub const HIDDEN1_COUNT: usize = 3; // neurons in hidden layer 1
pub const HIDDEN2_COUNT: usize = 3; // neurons in hidden layer 2
pub const OUTPUT_COUNT: usize = 1; // scalar output

/// Weight matrices, stored row-major as they travel over the wire.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Weights {
    pub w1: Vec<Vec<f64>>, // input -> hidden 1 (1x3)
    pub w2: Vec<Vec<f64>>, // hidden 1 -> hidden 2 (3x3)
    pub w3: Vec<Vec<f64>>, // hidden 2 -> output (3x1)
}

/// Bias vectors, one per non-input layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Biases {
    pub b1: Vec<f64>, // hidden 1 (len 3)
    pub b2: Vec<f64>, // hidden 2 (len 3)
    pub b3: Vec<f64>, // output (len 1)
}

/// The complete parameter set for one evaluation. Immutable once built;
/// callers hand a fresh one to every `evaluate` call.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NetParams {
    pub weights: Weights,
    pub biases: Biases,
}

impl NetParams {
    /// Draws a fresh parameter set with every weight and bias uniform in [-1, 1).
    pub fn new_random() -> Self {
        let mut rng = rand::thread_rng();

        let w1 = (0..INPUT_COUNT)
            .map(|_| {
                (0..HIDDEN1_COUNT)
                    .map(|_| rng.gen_range(-1.0..1.0))
                    .collect::<Vec<f64>>()
            })
            .collect::<Vec<Vec<f64>>>();

        let w2 = (0..HIDDEN1_COUNT)
            .map(|_| {
                (0..HIDDEN2_COUNT)
                    .map(|_| rng.gen_range(-1.0..1.0))
                    .collect::<Vec<f64>>()
            })
            .collect::<Vec<Vec<f64>>>();

        let w3 = (0..HIDDEN2_COUNT)
            .map(|_| {
                (0..OUTPUT_COUNT)
                    .map(|_| rng.gen_range(-1.0..1.0))
                    .collect::<Vec<f64>>()
            })
            .collect::<Vec<Vec<f64>>>();

        let b1 = (0..HIDDEN1_COUNT)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect::<Vec<f64>>();
        let b2 = (0..HIDDEN2_COUNT)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect::<Vec<f64>>();
        let b3 = (0..OUTPUT_COUNT)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect::<Vec<f64>>();

        Self {
            weights: Weights { w1, w2, w3 },
            biases: Biases { b1, b2, b3 },
        }
    }

    /// Shape check against the fixed topology. Reports the first offending field.
    pub fn validate(&self) -> Result<(), EvalError> {
        check_matrix("w1", &self.weights.w1, INPUT_COUNT, HIDDEN1_COUNT)?;
        check_matrix("w2", &self.weights.w2, HIDDEN1_COUNT, HIDDEN2_COUNT)?;
        check_matrix("w3", &self.weights.w3, HIDDEN2_COUNT, OUTPUT_COUNT)?;
        check_vector("b1", &self.biases.b1, HIDDEN1_COUNT)?;
        check_vector("b2", &self.biases.b2, HIDDEN2_COUNT)?;
        check_vector("b3", &self.biases.b3, OUTPUT_COUNT)?;
        Ok(())
    }
}

fn check_matrix(
    field: &'static str,
    m: &[Vec<f64>],
    rows: usize,
    cols: usize,
) -> Result<(), EvalError> {
    if m.len() == rows && m.iter().all(|row| row.len() == cols) {
        Ok(())
    } else {
        Err(EvalError::ShapeMismatch {
            field,
            expected: format!("{rows}x{cols}"),
            actual: matrix_shape(m),
        })
    }
}

fn check_vector(field: &'static str, v: &[f64], len: usize) -> Result<(), EvalError> {
    if v.len() == len {
        Ok(())
    } else {
        Err(EvalError::ShapeMismatch {
            field,
            expected: format!("len {len}"),
            actual: format!("len {}", v.len()),
        })
    }
}

fn matrix_shape(m: &[Vec<f64>]) -> String {
    match m.first() {
        None => "0x0".to_string(),
        Some(first) if m.iter().all(|row| row.len() == first.len()) => {
            format!("{}x{}", m.len(), first.len())
        }
        _ => format!("{} ragged rows", m.len()),
    }
}
