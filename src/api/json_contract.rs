use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{ChartSpecification, Renderer};

use super::ChartEngine;

pub const CHART_SPEC_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpecificationJsonContractV1 {
    pub schema_version: u32,
    pub specification: ChartSpecification,
}

impl ChartSpecification {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize specification json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSpecificationJsonContractV1 {
            schema_version: CHART_SPEC_JSON_SCHEMA_V1,
            specification: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!(
                "failed to serialize specification contract v1: {e}"
            ))
        })
    }

    /// Parses either a bare specification or a versioned v1 contract.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(specification) = serde_json::from_str::<ChartSpecification>(input) {
            return Ok(specification);
        }
        let payload: ChartSpecificationJsonContractV1 =
            serde_json::from_str(input).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse specification json payload: {e}"))
            })?;
        if payload.schema_version != CHART_SPEC_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported specification schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.specification)
    }
}

impl<R: Renderer> ChartEngine<R> {
    pub fn specification_json_pretty(&self) -> ChartResult<String> {
        self.specification().to_json_pretty()
    }

    pub fn specification_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.specification().to_json_contract_v1_pretty()
    }
}
