use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current preferences version. Bump this when adding fields or changing
/// shape, and add the matching step to [`migrate`].
const CURRENT_VERSION: u32 = 1;

const FILE_NAME: &str = "preferences.json";

/// Whether the listing shows the ascending sort as is, or reversed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Up,
    Down,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// The assessment fields the listing can sort on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    AuthorName,
    EvaluatorName,
    ValidatorName,
    CreatedAt,
    #[default]
    UpdatedAt,
    Status,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Card,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Schema version. Missing or 0 = pre-versioned file.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub sort_value: SortKey,
    #[serde(default)]
    pub homepage_display_mode: DisplayMode,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            sort_order: SortOrder::default(),
            sort_value: SortKey::default(),
            homepage_display_mode: DisplayMode::default(),
        }
    }
}

fn preferences_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("pia").join(FILE_NAME))
}

impl Preferences {
    /// Load from the platform config directory, falling back to defaults
    /// when no file has been written yet.
    pub fn load() -> eyre::Result<Self> {
        Self::load_from(&preferences_path()?)
    }

    pub fn save(&self) -> eyre::Result<()> {
        self.save_to(&preferences_path()?)
    }

    pub fn load_from(path: &Path) -> eyre::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read preferences at {}: {e}", path.display()))?;

        // Parse as raw JSON so migrations run before deserializing.
        let json: serde_json::Value = serde_json::from_str(&contents)?;
        let on_disk_version = json
            .get("configVersion")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;

        let migrated = migrate(json, on_disk_version)?;
        Ok(serde_json::from_value(migrated)?)
    }

    pub fn save_to(&self, path: &Path) -> eyre::Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| eyre::eyre!("preferences path {} has no parent", path.display()))?;
        std::fs::create_dir_all(dir)?;

        let mut stamped = self.clone();
        stamped.config_version = CURRENT_VERSION;
        let json = serde_json::to_string_pretty(&stamped)?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes())?;
        std::fs::rename(&tmp_path, path)?;

        tracing::info!(path = %path.display(), "preferences saved");
        Ok(())
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "preferences version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 -> v1: the sort pair was stored loosely. Unless both halves are
    // recognized, reset both to the defaults.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("preferences are not a JSON object"))?;
        let order_ok = obj
            .get("sortOrder")
            .is_some_and(|v| serde_json::from_value::<SortOrder>(v.clone()).is_ok());
        let value_ok = obj
            .get("sortValue")
            .is_some_and(|v| serde_json::from_value::<SortKey>(v.clone()).is_ok());
        if !(order_ok && value_ok) {
            obj.insert("sortOrder".to_string(), serde_json::to_value(SortOrder::default())?);
            obj.insert("sortValue".to_string(), serde_json::to_value(SortKey::default())?);
        }
        if obj
            .get("homepageDisplayMode")
            .is_some_and(|v| serde_json::from_value::<DisplayMode>(v.clone()).is_err())
        {
            obj.remove("homepageDisplayMode");
        }
        obj.insert(
            "configVersion".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated preferences v0 -> v1");
    }

    Ok(json)
}
