//! # Request Validation
//!
//! Shape checks for the link-account request body. Messages use the
//! `"<field>" <problem>` wording clients already match on, and the first
//! failing check wins: declared fields in order, then unknown keys.

use super::errors::AccountError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a link-account request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAccountRequest {
    /// Claimed wallet address, EIP-55 checksummed.
    pub address: String,
    /// Hex signature over the login challenge.
    pub signature: String,
    /// Twitter user id to link.
    pub user_id: String,
}

impl LinkAccountRequest {
    /// Accepted keys, in validation order.
    pub const FIELDS: [&'static str; 3] = ["address", "signature", "userId"];

    /// Validate a raw JSON body and extract the request.
    pub fn from_json(body: &Value) -> Result<Self, AccountError> {
        let Some(object) = body.as_object() else {
            return Err(AccountError::validation(
                "\"value\" must be of type object",
            ));
        };

        let address = required_string(object, "address")?;
        let signature = required_string(object, "signature")?;
        let user_id = required_string(object, "userId")?;

        if let Some(unknown) = object.keys().find(|k| !Self::FIELDS.contains(&k.as_str())) {
            return Err(AccountError::validation(format!(
                "\"{unknown}\" is not allowed"
            )));
        }

        Ok(Self {
            address,
            signature,
            user_id,
        })
    }
}

fn required_string(object: &Map<String, Value>, field: &str) -> Result<String, AccountError> {
    match object.get(field) {
        None => Err(AccountError::validation(format!(
            "\"{field}\" is required"
        ))),
        Some(Value::String(s)) if s.is_empty() => Err(AccountError::validation(format!(
            "\"{field}\" is not allowed to be empty"
        ))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(AccountError::validation(format!(
            "\"{field}\" must be a string"
        ))),
    }
}
