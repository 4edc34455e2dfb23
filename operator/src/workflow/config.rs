use anyhow::Context;
use sirstream::SessionConfig;
use std::fs;
use std::path::Path;

/// Command-line values that win over the YAML file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub history_capacity: Option<usize>,
    pub connect_timeout_ms: Option<u64>,
}

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<SessionConfig> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading session config {}", path_ref.display()))?;
    let config: SessionConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing session config {}", path_ref.display()))?;
    config
        .parameters
        .validate()
        .with_context(|| format!("validating parameters in {}", path_ref.display()))?;
    Ok(config)
}

pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> anyhow::Result<SessionConfig> {
    let mut config = match path {
        Some(path) => load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(base_url) = &overrides.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(capacity) = overrides.history_capacity {
        config.history_capacity = capacity;
    }
    if let Some(timeout_ms) = overrides.connect_timeout_ms {
        config.connect_timeout_ms = timeout_ms;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"base_url: http://sim.local:8080\nhistory_capacity: 50\nparameters:\n  populationSize: 400\n  transmissionRate: 0.3\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = load(&path).unwrap();
        assert_eq!(cfg.history_capacity, 50);
        assert_eq!(cfg.parameters.population_size, 400);
        assert_eq!(cfg.parameters.recovery_rate, 0.05);
        assert_eq!(cfg.stream_url(), "http://sim.local:8080/api/simulation/stream");
    }

    #[test]
    fn config_load_rejects_out_of_domain_parameters() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"parameters:\n  recoveryRate: 4.0\n").unwrap();
        let path = temp.into_temp_path();
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("recoveryRate"));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let overrides = ConfigOverrides {
            base_url: Some("http://10.0.0.2:8080".into()),
            history_capacity: Some(10),
            connect_timeout_ms: None,
        };
        let cfg = resolve(None, &overrides).unwrap();
        assert_eq!(cfg.base_url, "http://10.0.0.2:8080");
        assert_eq!(cfg.history_capacity, 10);
        assert_eq!(cfg.connect_timeout_ms, 10_000);
    }
}
