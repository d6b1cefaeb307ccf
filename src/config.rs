use std::fs;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::PfSplitError;
use crate::tables::{DEFAULT_CONTIG_PREFIX, DEFAULT_ORF_PREFIX};

pub const DEFAULT_CONFIG_FILE: &str = "pfsplit.json";

pub const DEMO_PF: &str = "demos/0.pf";
pub const DEMO_ANNOTATION: &str = "demos/ORF_annotation_table.txt";
pub const DEMO_BIN_MAP: &str = "demos/contig_info.tsv";
pub const DEMO_ORF_MAP: &str = "demos/orf_map.txt";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub pf: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub bin_map: Option<String>,
    #[serde(default)]
    pub orf_map: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub sample_name: Option<String>,
    #[serde(default)]
    pub orf_prefix: Option<String>,
    #[serde(default)]
    pub contig_prefix: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub pf: Option<Utf8PathBuf>,
    pub annotation: Option<Utf8PathBuf>,
    pub bin_map: Option<Utf8PathBuf>,
    pub orf_map: Option<Utf8PathBuf>,
    pub output: Option<Utf8PathBuf>,
    pub sample_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub pf: Utf8PathBuf,
    pub annotation: Utf8PathBuf,
    pub bin_map: Utf8PathBuf,
    pub orf_map: Utf8PathBuf,
    pub output: Utf8PathBuf,
    pub sample_name: Option<String>,
    pub orf_prefix: String,
    pub contig_prefix: String,
}

pub struct ConfigLoader;

impl ConfigLoader {
    // An explicit --config path must exist; the default pfsplit.json is
    // optional, and absent file-level values fall back to the bundled demo
    // dataset.
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, PfSplitError> {
        let config_path = match path {
            Some(path) => Utf8PathBuf::from(path),
            None => Utf8PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config = if path.is_none() && !config_path.as_std_path().exists() {
            Config::default()
        } else {
            let content = fs::read_to_string(config_path.as_std_path())
                .map_err(|_| PfSplitError::ConfigRead(config_path.clone()))?;
            serde_json::from_str(&content)
                .map_err(|err| PfSplitError::ConfigParse(err.to_string()))?
        };

        Ok(Self::resolve_config(config, overrides))
    }

    pub fn resolve_config(config: Config, overrides: ConfigOverrides) -> ResolvedConfig {
        ResolvedConfig {
            pf: resolve_path(overrides.pf, config.pf, DEMO_PF),
            annotation: resolve_path(overrides.annotation, config.annotation, DEMO_ANNOTATION),
            bin_map: resolve_path(overrides.bin_map, config.bin_map, DEMO_BIN_MAP),
            orf_map: resolve_path(overrides.orf_map, config.orf_map, DEMO_ORF_MAP),
            output: resolve_path(overrides.output, config.output, "."),
            sample_name: overrides.sample_name.or(config.sample_name),
            orf_prefix: config
                .orf_prefix
                .unwrap_or_else(|| DEFAULT_ORF_PREFIX.to_string()),
            contig_prefix: config
                .contig_prefix
                .unwrap_or_else(|| DEFAULT_CONTIG_PREFIX.to_string()),
        }
    }
}

fn resolve_path(
    override_value: Option<Utf8PathBuf>,
    config_value: Option<String>,
    default: &str,
) -> Utf8PathBuf {
    override_value
        .or_else(|| config_value.map(Utf8PathBuf::from))
        .unwrap_or_else(|| Utf8PathBuf::from(default))
}
