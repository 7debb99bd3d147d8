//! Naive Einstein summation over dynamic-rank tensors with axis ids.
//!
//! Axes are labelled by spin node ids instead of letter notation, so the
//! factors of a local network contract over shared node labels directly.
//! Every spin id is a hyperedge (it appears in its single-site vector and
//! in every incident coupling matrix), so contraction proceeds one summed
//! id at a time, multiplying together all factors that carry it. Dimensions
//! here are always 2 and local networks are small, so the elementwise
//! kernels below are sufficient; no matmul backend is involved.

use std::collections::HashMap;

use mdarray::{DynRank, Tensor};

use crate::error::ContractionError;

/// A factor: its axis ids (one per tensor axis, in order) and its data.
/// Scalars are represented with empty ids and a length-1 tensor.
pub(crate) type Factor = (Vec<usize>, Tensor<f64, DynRank>);

/// Contracts all factors over shared axis ids, leaving `output_ids` free.
///
/// Summed ids are eliminated in ascending order, which makes the result
/// bit-deterministic for identical input.
pub(crate) fn contract_network(
    mut operands: Vec<Factor>,
    output_ids: &[usize],
) -> Result<Tensor<f64, DynRank>, ContractionError> {
    let mut dims: HashMap<usize, usize> = HashMap::new();
    for (ids, tensor) in &operands {
        for (axis, &id) in ids.iter().enumerate() {
            let dim = tensor.dim(axis);
            if let Some(previous) = dims.insert(id, dim) {
                if previous != dim {
                    return Err(ContractionError::AxisMismatch {
                        id,
                        left: previous,
                        right: dim,
                    });
                }
            }
        }
    }
    for &id in output_ids {
        if !dims.contains_key(&id) {
            return Err(ContractionError::OpenIndexNotFound(id));
        }
    }

    let mut summed: Vec<usize> = dims
        .keys()
        .copied()
        .filter(|id| !output_ids.contains(id))
        .collect();
    summed.sort_unstable();

    for id in summed {
        let mut sharing = Vec::new();
        let mut kept = Vec::new();
        for operand in operands {
            if operand.0.contains(&id) {
                sharing.push(operand);
            } else {
                kept.push(operand);
            }
        }
        operands = kept;
        if sharing.is_empty() {
            continue;
        }
        operands.push(eliminate_axis(&sharing, id, &dims));
    }

    Ok(multiply_factors(&operands, output_ids, &dims))
}

/// Sums over one axis id the product of all factors that carry it. The
/// result keeps every other id of the consumed factors (first-seen order).
fn eliminate_axis(factors: &[Factor], summed_id: usize, dims: &HashMap<usize, usize>) -> Factor {
    let mut out_ids: Vec<usize> = Vec::new();
    for (ids, _) in factors {
        for &id in ids {
            if id != summed_id && !out_ids.contains(&id) {
                out_ids.push(id);
            }
        }
    }
    let out_shape: Vec<usize> = out_ids.iter().map(|id| dims[id]).collect();
    let summed_dim = dims[&summed_id];

    let strides = compute_strides(&out_shape);
    let out_len: usize = out_shape.iter().product::<usize>().max(1);
    let mut data = vec![0.0f64; out_len];

    for value in 0..summed_dim {
        iterate_multi_index(&out_shape, |index| {
            let mut product = 1.0;
            for (ids, tensor) in factors {
                let position = factor_position(ids, &out_ids, index, Some((summed_id, value)));
                product *= tensor[&position[..]];
            }
            let flat: usize = index
                .iter()
                .zip(strides.iter())
                .map(|(&i, &stride)| i * stride)
                .sum();
            data[flat] += product;
        });
    }

    (out_ids, tensor_from(data, out_shape))
}

/// Elementwise product of factors whose ids are all contained in `out_ids`;
/// scalar factors multiply in uniformly.
fn multiply_factors(
    factors: &[Factor],
    out_ids: &[usize],
    dims: &HashMap<usize, usize>,
) -> Tensor<f64, DynRank> {
    let out_shape: Vec<usize> = out_ids.iter().map(|id| dims[id]).collect();
    let strides = compute_strides(&out_shape);
    let out_len: usize = out_shape.iter().product::<usize>().max(1);
    let mut data = vec![0.0f64; out_len];

    iterate_multi_index(&out_shape, |index| {
        let mut product = 1.0;
        for (ids, tensor) in factors {
            let position = factor_position(ids, out_ids, index, None);
            product *= tensor[&position[..]];
        }
        let flat: usize = index
            .iter()
            .zip(strides.iter())
            .map(|(&i, &stride)| i * stride)
            .sum();
        data[flat] = product;
    });

    tensor_from(data, out_shape)
}

/// Index into a factor for a given output multi-index, optionally fixing
/// the summed axis to a value. Scalar factors index their single slot.
fn factor_position(
    ids: &[usize],
    out_ids: &[usize],
    index: &[usize],
    summed: Option<(usize, usize)>,
) -> Vec<usize> {
    if ids.is_empty() {
        return vec![0];
    }
    ids.iter()
        .map(|&id| match summed {
            Some((summed_id, value)) if id == summed_id => value,
            _ => {
                let slot = out_ids
                    .iter()
                    .position(|&out| out == id)
                    .expect("factor axis id missing from output ids");
                index[slot]
            }
        })
        .collect()
}

fn tensor_from(data: Vec<f64>, shape: Vec<usize>) -> Tensor<f64, DynRank> {
    if shape.is_empty() {
        Tensor::from(data).into_shape([1]).into_dyn()
    } else {
        Tensor::from(data).into_shape(shape).into_dyn()
    }
}

fn compute_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len() - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

fn iterate_multi_index<F>(shape: &[usize], mut f: F)
where
    F: FnMut(&[usize]),
{
    if shape.is_empty() {
        f(&[]);
        return;
    }
    let total: usize = shape.iter().product();
    let mut index = vec![0; shape.len()];
    for _ in 0..total {
        f(&index);
        for axis in (0..shape.len()).rev() {
            index[axis] += 1;
            if index[axis] < shape[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
}
