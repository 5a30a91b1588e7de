//! Push service responses and error classification.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::transport::TransportResponse;
use crate::{PushError, Result};

/// Error codes documented by the push service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// 1000
    InternalError,
    /// 1001
    PostOnly,
    /// 1002
    MissingParameter,
    /// 1003
    IllegalParameter,
    /// 1004
    ValidationFailed,
    /// 1005
    BodyTooLarge,
    /// 1008
    IllegalAppKey,
    /// 1011
    NoTargets,
    /// 1020
    HttpsRequired,
    /// 1030
    ServiceTimeout,
    /// Any other code.
    Unknown(i64),
}

impl ApiErrorCode {
    /// Classify a numeric code.
    pub fn from_code(code: i64) -> Self {
        match code {
            1000 => Self::InternalError,
            1001 => Self::PostOnly,
            1002 => Self::MissingParameter,
            1003 => Self::IllegalParameter,
            1004 => Self::ValidationFailed,
            1005 => Self::BodyTooLarge,
            1008 => Self::IllegalAppKey,
            1011 => Self::NoTargets,
            1020 => Self::HttpsRequired,
            1030 => Self::ServiceTimeout,
            other => Self::Unknown(other),
        }
    }

    /// Local description of the code.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InternalError => "internal system error",
            Self::PostOnly => "only HTTP POST supported",
            Self::MissingParameter => "missing required parameter",
            Self::IllegalParameter => "illegal parameter value",
            Self::ValidationFailed => "validation failed",
            Self::BodyTooLarge => "message body too large",
            Self::IllegalAppKey => "illegal app key",
            Self::NoTargets => "no targets matched",
            Self::HttpsRequired => "HTTPS required",
            Self::ServiceTimeout => "internal service timeout",
            Self::Unknown(_) => "unknown interface error",
        }
    }
}

impl From<i64> for ApiErrorCode {
    fn from(code: i64) -> Self {
        Self::from_code(code)
    }
}

/// Successful push response.
#[derive(Debug, Clone, PartialEq)]
pub struct PushResponse {
    /// HTTP status.
    pub status: u16,
    /// Sequence number echoed by the service.
    pub sendno: Option<String>,
    /// ID assigned to the push.
    pub msg_id: Option<String>,
    /// Decoded response body.
    pub body: Value,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Numbers may come back as JSON numbers or as numeric strings.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_code(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Turn a raw transport response into a push result.
pub fn classify(response: TransportResponse) -> Result<PushResponse> {
    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) if (200..300).contains(&response.status) => {
            return Err(PushError::InvalidResponse(format!(
                "body is not JSON ({}): {}",
                e, response.body
            )));
        }
        Err(_) => {
            return Err(PushError::Transport(format!(
                "HTTP {}: {}",
                response.status, response.body
            )));
        }
    };

    if body.get("error").is_some_and(|e| !e.is_null()) {
        let envelope: ErrorEnvelope = serde_json::from_value(body.clone())
            .map_err(|e| PushError::InvalidResponse(format!("malformed error object: {}", e)))?;
        let code = scalar_code(envelope.error.code.as_ref());
        let kind = ApiErrorCode::from_code(code);
        warn!(
            code,
            status = response.status,
            remote_message = envelope.error.message.as_deref().unwrap_or(""),
            "Push service returned an error"
        );
        return Err(PushError::Api {
            code,
            message: kind.message().to_string(),
        });
    }

    if !(200..300).contains(&response.status) {
        return Err(PushError::Transport(format!(
            "HTTP {}: {}",
            response.status, response.body
        )));
    }

    let sendno = body.get("sendno").and_then(scalar_string);
    let msg_id = body.get("msg_id").and_then(scalar_string);
    debug!(msg_id = msg_id.as_deref().unwrap_or(""), "Push accepted");

    Ok(PushResponse {
        status: response.status,
        sendno,
        msg_id,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_error_table() {
        let table = [
            (1000, "internal system error"),
            (1001, "only HTTP POST supported"),
            (1002, "missing required parameter"),
            (1003, "illegal parameter value"),
            (1004, "validation failed"),
            (1005, "message body too large"),
            (1008, "illegal app key"),
            (1011, "no targets matched"),
            (1020, "HTTPS required"),
            (1030, "internal service timeout"),
            (4242, "unknown interface error"),
        ];
        for (code, message) in table {
            assert_eq!(ApiErrorCode::from_code(code).message(), message);
        }
    }

    #[test]
    fn test_classify_success() {
        let result = classify(response(200, r#"{"sendno":"18","msg_id":"1828256757"}"#)).unwrap();
        assert_eq!(result.sendno.as_deref(), Some("18"));
        assert_eq!(result.msg_id.as_deref(), Some("1828256757"));
        assert_eq!(result.body["msg_id"], json!("1828256757"));
    }

    #[test]
    fn test_classify_numeric_ids() {
        let result = classify(response(200, r#"{"sendno":0,"msg_id":123}"#)).unwrap();
        assert_eq!(result.sendno.as_deref(), Some("0"));
        assert_eq!(result.msg_id.as_deref(), Some("123"));
    }

    #[test]
    fn test_classify_api_error() {
        let err = classify(response(400, r#"{"error":{"code":1011,"message":"cannot find user"}}"#))
            .unwrap_err();
        assert_eq!(
            err,
            PushError::Api {
                code: 1011,
                message: "no targets matched".into()
            }
        );
    }

    #[test]
    fn test_classify_string_code_and_success_status() {
        let err = classify(response(200, r#"{"error":{"code":"1004"}}"#)).unwrap_err();
        assert_eq!(err.api_code(), Some(1004));
        assert_eq!(err.to_string(), "API error 1004: validation failed");
    }

    #[test]
    fn test_classify_unknown_code() {
        let err = classify(response(400, r#"{"error":{"code":2002}}"#)).unwrap_err();
        assert_eq!(
            err,
            PushError::Api {
                code: 2002,
                message: "unknown interface error".into()
            }
        );
    }

    #[test]
    fn test_classify_non_json() {
        assert!(matches!(
            classify(response(200, "<html>")),
            Err(PushError::InvalidResponse(_))
        ));
        assert_eq!(
            classify(response(502, "Bad Gateway")).unwrap_err(),
            PushError::Transport("HTTP 502: Bad Gateway".into())
        );
    }

    #[test]
    fn test_classify_http_error_without_error_object() {
        let err = classify(response(500, r#"{"oops":true}"#)).unwrap_err();
        assert!(matches!(err, PushError::Transport(_)));
    }
}
