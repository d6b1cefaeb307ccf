use std::fs;

use serde::Serialize;
use tracing::{debug, info};

use crate::bundle::{BundleWriter, DEFAULT_SAMPLE_NAME, derive_sample_name};
use crate::config::ResolvedConfig;
use crate::error::PfSplitError;
use crate::expand::reinsert_duplicates;
use crate::partition::{Partition, partition_records};
use crate::pf;
use crate::tables;

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub sample_name: String,
    pub total_records: usize,
    pub bins: Vec<BinSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BinSummary {
    pub bin_id: String,
    pub records: usize,
    pub path: String,
}

pub struct App {
    config: ResolvedConfig,
}

impl App {
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<RunResult, PfSplitError> {
        let text = fs::read_to_string(self.config.pf.as_std_path())
            .map_err(|_| PfSplitError::InputRead(self.config.pf.clone()))?;
        let records = pf::parse_records(&text)?;
        debug!(records = records.len(), "parsed reaction records");

        let groups = tables::load_duplicate_map(&self.config.orf_map)?;
        let annotation =
            tables::load_annotation_table(&self.config.annotation, &self.config.orf_prefix)?;
        let bin_map = tables::load_bin_map(&self.config.bin_map, &self.config.contig_prefix)?;

        let records = reinsert_duplicates(records, &groups)?;
        info!(
            records = records.len(),
            duplicate_groups = groups.len(),
            "reinserted deduplicated ORFs"
        );

        let partition = partition_records(records, &annotation, &bin_map);
        let sample_name = self.resolve_sample_name(&partition);

        let writer = BundleWriter::new(&self.config.output, sample_name.clone());
        let dirs = writer.write_all(&partition)?;
        info!(bins = dirs.len(), root = %writer.results_root(), "wrote bin bundles");

        let bins = partition
            .bins
            .iter()
            .zip(&dirs)
            .map(|(group, dir)| BinSummary {
                bin_id: group.bin_id.clone(),
                records: group.rows.len(),
                path: dir.to_string(),
            })
            .collect();

        Ok(RunResult {
            sample_name,
            total_records: partition.total_rows(),
            bins,
        })
    }

    fn resolve_sample_name(&self, partition: &Partition) -> String {
        if let Some(name) = &self.config.sample_name {
            return name.clone();
        }
        partition
            .bins
            .iter()
            .flat_map(|group| &group.rows)
            .find_map(|row| row.contig_id.as_deref())
            .and_then(derive_sample_name)
            .unwrap_or(DEFAULT_SAMPLE_NAME)
            .to_string()
    }
}
