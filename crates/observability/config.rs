use std::env;

#[derive(Debug, Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    pub(crate) log_format: LogFormat,
    /// Warnings captured during config parsing so they can be logged after tracing is initialized.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_lookup(component, |key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(component: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let component = component.trim().to_string();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let service_context = ServiceContext {
            service_name: non_empty("SERVICE_NAME").unwrap_or_else(|| component.clone()),
            environment: non_empty("STAGE").unwrap_or_else(|| "unknown".to_string()),
            component,
        };

        let mut warnings = Vec::new();
        let log_format = match non_empty("LOG_FORMAT") {
            None => LogFormat::Pretty,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                _ => {
                    warnings.push(format!(
                        "LOG_FORMAT is invalid (value: {raw}); defaulting to pretty"
                    ));
                    LogFormat::Pretty
                }
            },
        };

        Self {
            service_context,
            log_format,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> ObservabilityConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ObservabilityConfig::from_lookup("backend", |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_component_name_and_pretty_logs() {
        let config = config_with(&[]);
        assert_eq!(config.service_context.service_name, "backend");
        assert_eq!(config.service_context.environment, "unknown");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn invalid_log_format_is_a_warning_not_an_error() {
        let config = config_with(&[("LOG_FORMAT", "xml"), ("STAGE", "production")]);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.service_context.environment, "production");
        assert_eq!(config.warnings.len(), 1);
    }

    #[test]
    fn json_log_format_is_case_insensitive() {
        assert_eq!(config_with(&[("LOG_FORMAT", "JSON")]).log_format, LogFormat::Json);
    }
}
