use crate::error::SerializationError;

pub const DOUBLE_LEN: usize = std::mem::size_of::<f64>();

// IEEE-754 bits in big-endian order, so payloads compare equal across nodes.
pub fn encode_double(val: f64, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&val.to_be_bytes());
}

pub fn decode_double(data: &mut &[u8]) -> Result<f64, SerializationError> {
    let Some((bytes, rest)) = data.split_first_chunk::<DOUBLE_LEN>() else {
        return Err(SerializationError::Truncated {
            expected: DOUBLE_LEN,
            actual: data.len(),
        });
    };
    *data = rest;
    Ok(f64::from_be_bytes(*bytes))
}
