//! Plain-data projection of a [`Scale`](crate::core::Scale).
//!
//! A per-frame rendering context cannot hold references to host objects, so
//! scales cross that boundary as this `Copy` record and are evaluated with the
//! same free functions the owning scale uses. The snapshot is never kept in
//! sync automatically: call `Scale::to_serializable` again after rebuilding.

use serde::{Deserialize, Serialize};

use crate::core::scale::{
    BandAnchor, ScaleKind, band_evaluate, band_invert, linear_evaluate, linear_invert,
    log_evaluate, log_invert,
};
use crate::error::{ChartError, ChartResult};

pub const SERIALIZABLE_SCALE_VERSION: u32 = 1;
pub const SERIALIZABLE_SCALE_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableScale {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: ScaleKind,
    pub domain: [f64; 2],
    pub range: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

fn default_version() -> u32 {
    SERIALIZABLE_SCALE_VERSION
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerializableScaleJsonContractV1 {
    pub schema_version: u32,
    pub scale: SerializableScale,
}

impl SerializableScale {
    #[must_use]
    pub fn evaluate(&self, value: f64, anchor: BandAnchor) -> f64 {
        let domain = (self.domain[0], self.domain[1]);
        let range = (self.range[0], self.range[1]);
        match self.kind {
            ScaleKind::Linear => linear_evaluate(domain, range, value),
            ScaleKind::Log => log_evaluate(domain, range, value),
            ScaleKind::Band => {
                let step = self.step.unwrap_or(0.0);
                let bandwidth = self.bandwidth.unwrap_or(step);
                band_evaluate(domain, range, step, bandwidth, value, anchor)
            }
        }
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        let domain = (self.domain[0], self.domain[1]);
        let range = (self.range[0], self.range[1]);
        match self.kind {
            ScaleKind::Linear => linear_invert(domain, range, pixel),
            ScaleKind::Log => log_invert(domain, range, pixel),
            ScaleKind::Band => band_invert(domain, range, self.step.unwrap_or(0.0), pixel),
        }
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = SerializableScaleJsonContractV1 {
            schema_version: SERIALIZABLE_SCALE_JSON_SCHEMA_V1,
            scale: *self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize scale contract v1: {e}"))
        })
    }

    /// Parses either a bare record or a versioned v1 contract.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(scale) = serde_json::from_str::<Self>(input) {
            return Ok(scale);
        }
        let payload: SerializableScaleJsonContractV1 = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse scale json: {e}")))?;
        if payload.schema_version != SERIALIZABLE_SCALE_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported scale schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.scale)
    }
}
