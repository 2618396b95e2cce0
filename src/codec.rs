//! Binary form of a weight's parameters, shipped between search nodes.
//!
//! Layout: `slope` (f64), `delta` (f64), then one byte each for the wdf, idf
//! and wt normalizations. A payload must be consumed exactly.

use log::warn;

use crate::{
    error::{SerializationError, WeightError},
    normalization::{IdfNorm, Normalization, WdfNorm, WtNorm},
    options::TuningParams,
    utils::double::{decode_double, encode_double, DOUBLE_LEN},
    weight::TfIdfWeight,
};

pub const SERIALIZED_LEN: usize = 2 * DOUBLE_LEN + 3;

pub fn serialize(norm: &Normalization, params: &TuningParams) -> Vec<u8> {
    let mut result = Vec::with_capacity(SERIALIZED_LEN);
    encode_double(params.slope, &mut result);
    encode_double(params.delta, &mut result);
    result.push(norm.wdf as u8);
    result.push(norm.idf as u8);
    result.push(norm.wt as u8);
    result
}

pub fn deserialize(mut data: &[u8]) -> Result<(Normalization, TuningParams), SerializationError> {
    let slope = decode_double(&mut data)?;
    let delta = decode_double(&mut data)?;
    let &[wdf, idf, wt, ref rest @ ..] = data else {
        return Err(SerializationError::Truncated {
            expected: 3,
            actual: data.len(),
        });
    };
    if !rest.is_empty() {
        return Err(SerializationError::TrailingBytes(rest.len()));
    }
    let norm = Normalization::new(
        WdfNorm::try_from(wdf)?,
        IdfNorm::try_from(idf)?,
        WtNorm::try_from(wt)?,
    );
    Ok((norm, TuningParams::new(slope, delta)))
}

impl TfIdfWeight {
    pub fn deserialize(data: &[u8]) -> Result<Self, WeightError> {
        let (norm, params) = deserialize(data).inspect_err(|e| {
            warn!("failed to deserialize tfidf weight: {}", e);
        })?;
        TfIdfWeight::from_normalization(norm, params)
    }
}
