//! Data Transfer Objects
//!
//! Response types for the API endpoints. Every `/api` response is wrapped in
//! the same `{ success, data, error }` envelope.

use serde::Serialize;

/// Envelope shared by every `/api` response
#[derive(Debug, Serialize)]
pub struct BaseResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> BaseResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl BaseResponse<()> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Payload of `GET /api/me`
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    /// Identity attributes, `null` for anonymous visitors
    pub user: Option<serde_json::Value>,
    pub projects: Vec<PartialProject>,
}

impl MeResponse {
    /// Session of a visitor that has not signed in
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
            projects: Vec::new(),
        }
    }
}

/// Project summary listed on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct PartialProject {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub archived: bool,
    pub private: bool,
    pub open_issues: u32,
    pub active_issues: u32,
    pub resolved_issues: u32,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// Whether the template index is readable
    pub dictionary: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Service version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_empty_fields() {
        let json = serde_json::to_value(BaseResponse::ok(1)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 1 }));

        let json = serde_json::to_value(BaseResponse::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "nope" }));
    }

    #[test]
    fn test_anonymous_session_shape() {
        let json = serde_json::to_value(BaseResponse::ok(MeResponse::anonymous())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "data": { "authenticated": false, "user": null, "projects": [] }
            })
        );
    }
}
