//! Outbound payload encoding for create and update calls.

use serde::Serialize;
use serde_json::Value;

use crate::ModelError;

/// A model that can be sent as a create/update body.
///
/// Unset fields are already dropped by `skip_serializing_if`; this strips
/// the fields the server assigns, whatever the caller put in them.
pub trait Payload: Serialize {
    /// Top-level wire keys the server owns.
    const SERVER_ASSIGNED: &'static [&'static str] = &["id", "createdAt", "updatedAt"];

    fn to_payload(&self) -> Result<Value, ModelError> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            for key in Self::SERVER_ASSIGNED {
                map.remove(*key);
            }
        }
        Ok(value)
    }
}
