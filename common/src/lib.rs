//! AutoRestaurant Advisor Common Library
//!
//! CLIとリレーサーバーで共有される型とロジック（I/Oなし）

pub mod types;
pub mod catalog;
pub mod error;
pub mod prompts;
pub mod parser;
pub mod reconcile;
pub mod relay;
pub mod workflow;

pub use types::{
    AnalysisResult, ConfirmedStoreData, CurrentCost, EncodedImage, EnvironmentAnalysis, StoreInput,
};
pub use catalog::{price_table, EquipmentDef, AVAILABLE_EQUIPMENT, STORE_CATEGORIES};
pub use error::{Error, Result};
pub use prompts::{build_environment_prompt, build_planning_prompt, AnalysisStage};
pub use parser::{extract_json, parse_analysis, parse_environment, parse_result_payload};
pub use reconcile::{labor_overrides, reconcile, LaborOverride};
pub use relay::{GenerationConfig, RelayErrorBody, RelayRequest, RelayResponse};
pub use workflow::{Session, WorkflowError, WorkflowStatus};
