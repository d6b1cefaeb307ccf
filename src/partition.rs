use std::collections::HashMap;

use crate::pf::Record;
use crate::tables::{AnnotationRow, BinRow};

pub const NON_BINNED_BIN_ID: &str = "non_binned_metagenome";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinnedRecord {
    pub record: Record,
    pub contig_id: Option<String>,
    pub bin_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinGroup {
    pub bin_id: String,
    pub rows: Vec<BinnedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub bins: Vec<BinGroup>,
}

impl Partition {
    pub fn total_rows(&self) -> usize {
        self.bins.iter().map(|group| group.rows.len()).sum()
    }
}

pub fn partition_records(
    records: Vec<Record>,
    annotation: &[AnnotationRow],
    bin_map: &[BinRow],
) -> Partition {
    let with_contigs = join_contigs(records, annotation);
    let binned = join_bins(with_contigs, bin_map);
    group_by_bin(binned)
}

// Left join on orf_id. Duplicate annotation keys fan out, one output row per
// matching annotation row, in annotation file order.
pub fn join_contigs(
    records: Vec<Record>,
    annotation: &[AnnotationRow],
) -> Vec<(Record, Option<String>)> {
    let mut index: HashMap<&str, Vec<&str>> = HashMap::new();
    for row in annotation {
        index
            .entry(row.orf_id.as_str())
            .or_default()
            .push(row.contig_id.as_str());
    }

    let mut joined = Vec::new();
    for record in records {
        match index.get(record.orf_id.as_str()) {
            Some(contigs) => {
                for contig in contigs {
                    joined.push((record.clone(), Some(contig.to_string())));
                }
            }
            None => joined.push((record, None)),
        }
    }
    joined
}

// Left join on contig_id; rows without a bin (null contig included) resolve
// to the sentinel bin instead of null.
pub fn join_bins(rows: Vec<(Record, Option<String>)>, bin_map: &[BinRow]) -> Vec<BinnedRecord> {
    let mut index: HashMap<&str, Vec<&str>> = HashMap::new();
    for row in bin_map {
        index
            .entry(row.contig_id.as_str())
            .or_default()
            .push(row.bin_id.as_str());
    }

    let mut joined = Vec::new();
    for (record, contig_id) in rows {
        let bins = contig_id.as_deref().and_then(|contig| index.get(contig));
        match bins {
            Some(bins) => {
                for bin in bins {
                    joined.push(BinnedRecord {
                        record: record.clone(),
                        contig_id: contig_id.clone(),
                        bin_id: bin.to_string(),
                    });
                }
            }
            None => joined.push(BinnedRecord {
                record,
                contig_id,
                bin_id: NON_BINNED_BIN_ID.to_string(),
            }),
        }
    }
    joined
}

pub fn group_by_bin(rows: Vec<BinnedRecord>) -> Partition {
    let mut bins: Vec<BinGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let slot = match index.get(&row.bin_id) {
            Some(&slot) => slot,
            None => {
                index.insert(row.bin_id.clone(), bins.len());
                bins.push(BinGroup {
                    bin_id: row.bin_id.clone(),
                    rows: Vec::new(),
                });
                bins.len() - 1
            }
        };
        bins[slot].rows.push(row);
    }

    Partition { bins }
}
