//! Button payload wire format: base64 over a compact binary serialization
//! of `(i64 index, payload_bytes)`. `index` addresses a position in a
//! machine-wide, stably-ordered button set; a [`ButtonRegistry`] is the
//! Rust realization of that set, since the index is only meaningful
//! relative to the registration order a particular machine chose.

use std::any::TypeId;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::error::DecodeError;
use crate::projection::Button;

/// Assigns each registered button type a stable index, in registration
/// order, mirroring the machine-wide button set derived at build time.
#[derive(Debug, Default)]
pub struct ButtonRegistry {
    order: Vec<TypeId>,
}

impl ButtonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<Bn: Button + 'static>(&mut self) -> i64 {
        if let Some(idx) = self.index_of::<Bn>() {
            return idx;
        }
        let idx = self.order.len() as i64;
        self.order.push(TypeId::of::<Bn>());
        idx
    }

    pub fn index_of<Bn: Button + 'static>(&self) -> Option<i64> {
        self.order.iter().position(|t| *t == TypeId::of::<Bn>()).map(|i| i as i64)
    }

    pub fn encode<Bn: Button + 'static>(&self, payload: &Bn::Payload) -> Result<String, DecodeError> {
        let index = self.index_of::<Bn>().ok_or(DecodeError::UnregisteredButton)?;
        encode_envelope(index, payload)
    }

    /// Decodes `data` as a `Bn` payload, returning `None` if `data` is
    /// well-formed but addresses a different button (S5's out-of-range
    /// case is folded into this: any mismatched or unparsable index drops
    /// the callback rather than erroring the caller).
    pub fn decode<Bn: Button + 'static>(&self, data: &str) -> Option<Bn::Payload> {
        let (index, body) = decode_envelope(data).ok()?;
        let expected = self.index_of::<Bn>()?;
        if index != expected {
            return None;
        }
        bincode::deserialize(&body).ok()
    }
}

/// Reads only the index out of an encoded payload, without knowing the
/// payload type — used by the projector to decide which concrete button
/// type to retry decoding as.
pub fn peek_index(data: &str) -> Result<i64, DecodeError> {
    decode_envelope(data).map(|(index, _)| index)
}

fn encode_envelope<T: Serialize>(index: i64, payload: &T) -> Result<String, DecodeError> {
    let body = bincode::serialize(payload)?;
    let envelope = bincode::serialize(&(index, body))?;
    Ok(STANDARD.encode(envelope))
}

fn decode_envelope(data: &str) -> Result<(i64, Vec<u8>), DecodeError> {
    let envelope = STANDARD.decode(data)?;
    let (index, body): (i64, Vec<u8>) = bincode::deserialize(&envelope)?;
    Ok((index, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct Btn;
    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Payload(i32);
    impl Button for Btn {
        type Payload = Payload;
    }

    struct Other;
    impl Button for Other {
        type Payload = Payload;
    }

    #[test]
    fn round_trips_through_the_registry() {
        let mut registry = ButtonRegistry::new();
        registry.register::<Other>();
        registry.register::<Other>();
        registry.register::<Other>();
        let index = registry.register::<Btn>();
        assert_eq!(index, 3);

        let encoded = registry.encode::<Btn>(&Payload(42)).unwrap();
        assert_eq!(peek_index(&encoded).unwrap(), 3);
        assert_eq!(registry.decode::<Btn>(&encoded), Some(Payload(42)));
    }

    #[test]
    fn out_of_range_index_decodes_to_nothing() {
        let mut registry = ButtonRegistry::new();
        registry.register::<Btn>();
        let encoded = encode_envelope(9999, &Payload(1)).unwrap();
        assert_eq!(registry.decode::<Btn>(&encoded), None);
    }
}
