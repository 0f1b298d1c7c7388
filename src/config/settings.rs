#[derive(Debug, Clone)]
pub struct PairingSettings {
    pub recency_window: usize,
    pub active_results: Vec<String>,
    pub same_preference_penalty: f64,
    pub exclude_same_preference: bool,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            recency_window: 5,
            active_results: ["", "*", "started", "ongoing", "in progress"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            same_preference_penalty: 0.0,
            exclude_same_preference: false,
        }
    }
}

impl PairingSettings {
    /// A recorded result counts as "still being played" when it is blank or
    /// matches one of the configured sentinels (case-insensitive).
    pub fn is_active_result(&self, result: Option<&str>) -> bool {
        let normalized = match result {
            Some(text) => text.trim().to_lowercase(),
            None => return true,
        };

        self.active_results
            .iter()
            .any(|sentinel| sentinel.trim().to_lowercase() == normalized)
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "league.db".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pairing: PairingSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            pairing: PairingSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}
