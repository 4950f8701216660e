use super::{read_json, write_json_atomic, DataStore, StoreError};
use crate::models::KontrolConfig;

/// Loads `config.json`. Only a missing or unparsable document is an error; a checklist
/// without items is left for the form handlers to refuse.
pub fn read_config(store: &DataStore) -> Result<KontrolConfig, StoreError> {
    read_json(&store.config_path())
}

/// Every checklist must define at least one item.
pub fn validate_config(config: &KontrolConfig) -> Result<(), StoreError> {
    match config.bos_kontrol() {
        Some(tip) => Err(StoreError::EmptyChecklist(tip.to_string())),
        None => Ok(()),
    }
}

pub fn write_config(store: &DataStore, config: &KontrolConfig) -> Result<(), StoreError> {
    validate_config(config)?;
    let _guard = store.lock_writes();
    write_json_atomic(&store.config_path(), config)
}

/// Runs `change` against a fresh copy of the config under the write lock.
/// The document is written back only when `change` reports a modification.
pub fn update_config<F>(store: &DataStore, change: F) -> Result<KontrolConfig, StoreError>
where
    F: FnOnce(&mut KontrolConfig) -> bool,
{
    let _guard = store.lock_writes();
    let mut config = read_config(store)?;
    if change(&mut config) {
        write_json_atomic(&store.config_path(), &config)?;
    }
    Ok(config)
}
