//! Static capability listing served at `GET /` and printed by `info`.

use crate::types::{ApiInfo, EndpointInfo};

pub const API_NAME: &str = "SonoVision API";

pub struct EndpointRegistry;

impl EndpointRegistry {
    pub fn list_endpoints() -> Vec<EndpointInfo> {
        vec![
            EndpointInfo {
                path: "/identify",
                method: "POST",
                description: "Identify entities in images",
            },
            EndpointInfo {
                path: "/identify_base64",
                method: "POST",
                description: "Identify entities in base64-encoded images",
            },
            EndpointInfo {
                path: "/navigate",
                method: "POST",
                description: "Probe navigation guidance toward a target organ",
            },
            EndpointInfo {
                path: "/describe",
                method: "POST",
                description: "Diagnostic description of a scan",
            },
            EndpointInfo {
                path: "/analyze",
                method: "POST",
                description: "Identify, then diagnose or guide in one call",
            },
        ]
    }

    pub fn api_info() -> ApiInfo {
        ApiInfo {
            api: API_NAME,
            version: env!("CARGO_PKG_VERSION"),
            endpoints: Self::list_endpoints(),
        }
    }
}
