use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub temp_id_prefix: String,
    pub default_points: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            temp_id_prefix: env::var("QUIZ_TEMP_ID_PREFIX").unwrap_or_else(|_| "tmp-".to_string()),
            default_points: env::var("QUIZ_DEFAULT_POINTS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            temp_id_prefix: "tmp-".to_string(),
            default_points: 1,
        }
    }
}
