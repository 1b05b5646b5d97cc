//! JSON response bodies.

use serde::Serialize;

use sono_vision::Stage;

/// Body of `POST /navigate`.
#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub response: String,
}

/// Body of `POST /describe`.
#[derive(Debug, Serialize)]
pub struct DescribeResponse {
    pub description: String,
}

/// Body of `POST /analyze`: identification plus whichever follow-up ran.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub entity: String,
    pub found: bool,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

/// One entry in the capability listing.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    pub path: &'static str,
    pub method: &'static str,
    pub description: &'static str,
}

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub api: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}
