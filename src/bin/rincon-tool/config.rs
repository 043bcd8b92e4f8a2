use std::env;
use std::path::PathBuf;

use rincon::config::{read_config, Config};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()));
    let cur_dir = env::current_dir().ok();

    [exe_dir, cur_dir, dirs::config_dir()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Explicit path first, then the usual places. No file at all means defaults.
pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(get_config_path) {
        Some(path) => path,
        None => {
            println!("No {} found. Using defaults", CFG_FILE_NAME);
            return Ok(Config::default());
        }
    };

    println!("Reading config from {}", config_path.display());
    let mut config = read_config(&config_path).map_err(|e| e.to_string())?;

    if let Some(mut log) = config.log {
        if log.location.is_none() {
            log.location = dirs::cache_dir().map(|dir| dir.join("Rincon").join("log").join("tool.log"));
        }
        if let Some(ref location) = log.location {
            println!("Log enabled. Files will be written in {}", location.display());
        }
        config.log = Some(log);
    }

    Ok(config)
}
