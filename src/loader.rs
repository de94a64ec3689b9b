//! Reading configuration files and persisting trained models.
//!
//! Configurations are TOML, models are RON.

use std::fs;
use std::path::Path;

use layered_coref_document::CorefResult;

use crate::{CorefSystem, SystemConfig, TrainedModel};

/// Load a TOML system configuration.
pub fn load_config(path: &Path) -> CorefResult<SystemConfig> {
    let content = fs::read_to_string(path)?;
    SystemConfig::from_toml_str(&content)
}

pub fn save_model(path: &Path, model: &TrainedModel) -> CorefResult<()> {
    fs::write(path, model.to_ron()?)?;
    log::info!("saved {} model to {}", model.kind(), path.display());
    Ok(())
}

pub fn load_model(path: &Path) -> CorefResult<TrainedModel> {
    let content = fs::read_to_string(path)?;
    TrainedModel::from_ron(&content)
}

/// Build a system from a configuration file and, optionally, a saved model.
pub fn load_system(config: &Path, model: Option<&Path>) -> CorefResult<CorefSystem> {
    let system = load_config(config)?.build()?;
    match model {
        Some(path) => system.with_model(load_model(path)?),
        None => Ok(system),
    }
}
