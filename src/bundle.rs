use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::PfSplitError;
use crate::partition::{BinGroup, Partition};
use crate::pf;

pub const DEFAULT_SAMPLE_NAME: &str = "metagenome";
pub const RECORD_FILE_NAME: &str = "0.pf";

#[derive(Debug, Clone)]
pub struct BundleWriter {
    results_root: Utf8PathBuf,
    sample_name: String,
}

impl BundleWriter {
    pub fn new(output_root: &Utf8Path, sample_name: impl Into<String>) -> Self {
        Self {
            results_root: output_root.join("results"),
            sample_name: sample_name.into(),
        }
    }

    pub fn results_root(&self) -> &Utf8Path {
        &self.results_root
    }

    pub fn bin_dir(&self, bin_id: &str) -> Utf8PathBuf {
        self.results_root.join(bin_id)
    }

    // A stale results tree from a previous run is removed wholesale before
    // any bin directory is written.
    pub fn write_all(&self, partition: &Partition) -> Result<Vec<Utf8PathBuf>, PfSplitError> {
        self.reset_results_root()?;
        let mut written = Vec::new();
        for group in &partition.bins {
            let dir = self.bin_dir(&group.bin_id);
            self.write_bin(group, &dir)?;
            written.push(dir);
        }
        Ok(written)
    }

    fn reset_results_root(&self) -> Result<(), PfSplitError> {
        if self.results_root.as_std_path().exists() {
            fs::remove_dir_all(self.results_root.as_std_path())
                .map_err(|err| PfSplitError::Filesystem(err.to_string()))?;
        }
        fs::create_dir_all(self.results_root.as_std_path())
            .map_err(|err| PfSplitError::Filesystem(err.to_string()))
    }

    fn write_bin(&self, group: &BinGroup, dir: &Utf8Path) -> Result<(), PfSplitError> {
        fs::create_dir_all(dir.as_std_path())
            .map_err(|err| PfSplitError::Filesystem(err.to_string()))?;

        let records = pf::render_records(group.rows.iter().map(|row| &row.record));
        write_file(&dir.join(RECORD_FILE_NAME), &records)?;
        write_file(&dir.join("genetic-elements.dat"), &genetic_elements())?;
        write_file(
            &dir.join("organism-params.dat"),
            &organism_params(&self.sample_name),
        )?;
        write_file(&dir.join(format!("{}.dummy.txt", self.sample_name)), "")?;
        Ok(())
    }
}

// Strip the trailing `_<n>` contig counter to recover the sample name the
// annotation pipeline prepends to every contig.
pub fn derive_sample_name(contig_id: &str) -> Option<&str> {
    contig_id.rfind('_').map(|idx| &contig_id[..idx])
}

fn genetic_elements() -> String {
    let mut out = String::new();
    out.push_str("ID\t0\n");
    out.push_str("NAME\t0\n");
    out.push_str("TYPE\t:CONTIG\n");
    out.push_str(&format!("ANNOT-FILE\t{RECORD_FILE_NAME}\n"));
    out.push_str("//\n");
    out
}

fn organism_params(sample_name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("ID\t{sample_name}\n"));
    out.push_str("STORAGE FILE\n");
    out.push_str(&format!("ABBREV-NAME\t{sample_name}\n"));
    out.push_str("STRAIN\t1\n");
    out.push_str("RANK\t|species|\n");
    out.push_str("NCBI-TAXON-ID\t12908\n");
    out
}

fn write_file(path: &Utf8Path, content: &str) -> Result<(), PfSplitError> {
    fs::write(path.as_std_path(), content)
        .map_err(|err| PfSplitError::Filesystem(format!("write {path}: {err}")))
}
