//! Platform wire envelope
//!
//! Every platform response wraps its payload as `{code, message, data}`.
//! Code 0 is success; any other code is an error with `message` as the
//! human-readable detail. SDKs must translate a non-zero code into a typed
//! error, never swallow it.

use serde::{Deserialize, Serialize};

/// The `{code, message, data}` wrapper used by all platform responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// 0 on success; stable error code otherwise.
    pub code: i64,
    /// Human-readable detail, "ok" on success.
    #[serde(default)]
    pub message: String,
    /// Payload, present on success.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful envelope around a payload.
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Error envelope with a non-zero code.
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Unwrap the payload, or return the `(code, message)` pair.
    pub fn into_result(self) -> Result<T, (i64, String)> {
        if self.code == 0 {
            match self.data {
                Some(data) => Ok(data),
                None => Err((0, "missing data in success envelope".to_string())),
            }
        } else {
            Err((self.code, self.message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_round_trip() {
        let envelope = Envelope::ok(vec![1, 2, 3]);
        let json = serde_json::to_string(&envelope).unwrap();
        let back: Envelope<Vec<i32>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_result().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_error_preserves_code_and_message() {
        let envelope: Envelope<()> = Envelope::error(1401, "invalid token");
        let (code, message) = envelope.into_result().unwrap_err();
        assert_eq!(code, 1401);
        assert_eq!(message, "invalid token");
    }

    #[test]
    fn test_success_without_data_is_an_error() {
        let envelope: Envelope<String> = serde_json::from_str(r#"{"code":0,"message":"ok"}"#).unwrap();
        assert!(envelope.into_result().is_err());
    }
}
