use serde::Serialize;

use crate::error::EvalError;
use crate::params::{HIDDEN1_COUNT, HIDDEN2_COUNT, NetParams};

// max(0, x), written as a comparison so a NaN passes through instead of
// being swallowed by f64::max
fn relu(x: f64) -> f64 {
    if x < 0.0 { 0.0 } else { x }
}

/// Layer values produced by one input sample on its way through the network.
struct SamplePoint {
    z1: [f64; HIDDEN1_COUNT],
    a1: [f64; HIDDEN1_COUNT],
    z2: [f64; HIDDEN2_COUNT],
    a2: [f64; HIDDEN2_COUNT],
    y: f64,
}

/// The full layer-by-layer record of a forward pass over an input domain.
/// Every sequence has the domain's length and is aligned with it by index.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ForwardTrace {
    pub x_values: Vec<f64>,
    pub hidden1_pre: Vec<[f64; HIDDEN1_COUNT]>,
    pub hidden1_post: Vec<[f64; HIDDEN1_COUNT]>,
    pub hidden2_pre: Vec<[f64; HIDDEN2_COUNT]>,
    pub hidden2_post: Vec<[f64; HIDDEN2_COUNT]>,
    pub outputs: Vec<f64>,
}

/// Runs the 1-3-3-1 network over every sample in `xs`.
///
/// Shapes are checked up front and an empty domain is refused, so an `Err`
/// means no computation happened at all. The pass itself is a pure function
/// of its inputs: same parameters and domain, bit-identical trace.
pub fn evaluate(params: &NetParams, xs: &[f64]) -> Result<ForwardTrace, EvalError> {
    params.validate()?;
    if xs.is_empty() {
        return Err(EvalError::EmptyDomain);
    }

    let points = xs
        .iter()
        .map(|&x| forward_sample(params, x))
        .collect::<Vec<SamplePoint>>();

    // transpose the per-sample records into the per-layer sequences the charts consume
    let mut trace = ForwardTrace {
        x_values: xs.to_vec(),
        hidden1_pre: Vec::with_capacity(points.len()),
        hidden1_post: Vec::with_capacity(points.len()),
        hidden2_pre: Vec::with_capacity(points.len()),
        hidden2_post: Vec::with_capacity(points.len()),
        outputs: Vec::with_capacity(points.len()),
    };
    for p in points {
        trace.hidden1_pre.push(p.z1);
        trace.hidden1_post.push(p.a1);
        trace.hidden2_pre.push(p.z2);
        trace.hidden2_post.push(p.a2);
        trace.outputs.push(p.y);
    }
    Ok(trace)
}

// shapes are validated by the caller; indexing below relies on that
fn forward_sample(p: &NetParams, x: f64) -> SamplePoint {
    let w = &p.weights;
    let b = &p.biases;

    // hidden layer 1: the scalar input fans out to three units
    let mut z1 = [0.0; HIDDEN1_COUNT];
    for j in 0..HIDDEN1_COUNT {
        z1[j] = x * w.w1[0][j] + b.b1[j];
    }
    let a1 = z1.map(relu);

    // hidden layer 2
    let mut z2 = [0.0; HIDDEN2_COUNT];
    for k in 0..HIDDEN2_COUNT {
        let mut sum = b.b2[k];
        for j in 0..HIDDEN1_COUNT {
            sum += a1[j] * w.w2[j][k];
        }
        z2[k] = sum;
    }
    let a2 = z2.map(relu);

    // output layer collapses back to a scalar
    let mut y = b.b3[0];
    for j in 0..HIDDEN2_COUNT {
        y += a2[j] * w.w3[j][0];
    }

    SamplePoint { z1, a1, z2, a2, y }
}
