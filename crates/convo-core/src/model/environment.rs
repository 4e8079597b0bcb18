use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Entorno de la sesión: formatos, zona horaria e idiomas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_country: Option<String>,
}

fn default_date_format() -> String {
    "DD-MM-YYYY".to_string()
}

fn default_time_format() -> String {
    "tt:mm".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for Environment {
    fn default() -> Self {
        Self { date_format: default_date_format(),
               time_format: default_time_format(),
               timezone: default_timezone(),
               default_language: None,
               allowed_languages: Vec::new(),
               default_country: None }
    }
}

impl Environment {
    /// Idiomas a probar al localizar, en orden de preferencia. El idioma del
    /// contacto sólo cuenta si el entorno lo permite.
    pub fn preferred_languages(&self, contact_language: Option<&str>) -> Vec<String> {
        let mut langs = Vec::new();
        if let Some(lang) = contact_language {
            if self.allowed_languages.iter().any(|l| l == lang) {
                langs.push(lang.to_string());
            }
        }
        if let Some(default) = &self.default_language {
            if !langs.contains(default) {
                langs.push(default.clone());
            }
        }
        langs
    }

    pub fn context(&self) -> Value {
        json!({
            "date_format": self.date_format,
            "time_format": self.time_format,
            "timezone": self.timezone,
            "default_language": self.default_language,
            "allowed_languages": self.allowed_languages,
            "default_country": self.default_country,
        })
    }
}
