//! `prefs`: manage per-user preferences.

use crate::cli::{PrefsAction, RuntimeConfig};
use crate::error::Result;
use crate::pipeline::{BUTLER_PATH_KEY, Preferences};

pub fn run_prefs(mut prefs: Preferences, action: &PrefsAction, runtime: &RuntimeConfig) -> Result<i32> {
    match action {
        PrefsAction::Show => {
            runtime.verbose_println(&format!("Preferences file: {}", prefs.path().display()))?;
            let mut empty = true;
            for (key, value) in prefs.iter() {
                runtime.println(&format!("{key} = {value}"))?;
                empty = false;
            }
            if empty {
                runtime.println("No preferences stored")?;
            }
        }
        PrefsAction::SetButler { path } => {
            if !path.is_file() {
                runtime.warn(&format!("{} does not exist yet", path.display()))?;
            }
            prefs.set(BUTLER_PATH_KEY, path.to_string_lossy())?;
            runtime.success(&format!("{BUTLER_PATH_KEY} = {}", path.display()))?;
        }
        PrefsAction::ClearButler => match prefs.remove(BUTLER_PATH_KEY)? {
            Some(previous) => runtime.success(&format!("Cleared {BUTLER_PATH_KEY} ({previous})"))?,
            None => runtime.println(&format!("{BUTLER_PATH_KEY} was not set"))?,
        },
    }
    Ok(0)
}
