use std::fs;

use camino::Utf8Path;
use csv::ReaderBuilder;

use crate::error::PfSplitError;
use crate::pf::OrfId;

pub const DEFAULT_ORF_PREFIX: &str = "O_";
pub const DEFAULT_CONTIG_PREFIX: &str = "GAPP-";

const ORF_ID_HEADERS: &[&str] = &["# ORF_ID", "ORF_ID"];
const ANNOTATION_CONTIG_HEADERS: &[&str] = &["CONTIG_ID"];
const BIN_ID_HEADERS: &[&str] = &["UniteM Bin ID", "BIN_ID"];
const BIN_CONTIG_HEADERS: &[&str] = &["Contig ID", "CONTIG_ID"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    pub orf_id: OrfId,
    pub contig_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinRow {
    pub contig_id: String,
    pub bin_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub intact: OrfId,
    pub duplicates: Vec<OrfId>,
}

pub fn load_annotation_table(
    path: &Utf8Path,
    orf_prefix: &str,
) -> Result<Vec<AnnotationRow>, PfSplitError> {
    let text = read_input(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| table_parse(path, err))?
        .clone();
    let orf_idx = column_index(&headers, ORF_ID_HEADERS, path)?;
    let contig_idx = column_index(&headers, ANNOTATION_CONTIG_HEADERS, path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|err| table_parse(path, err))?;
        rows.push(AnnotationRow {
            orf_id: OrfId::new(format!("{orf_prefix}{}", &row[orf_idx])),
            contig_id: row[contig_idx].to_string(),
        });
    }
    Ok(rows)
}

pub fn load_bin_map(path: &Utf8Path, contig_prefix: &str) -> Result<Vec<BinRow>, PfSplitError> {
    let text = read_input(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| table_parse(path, err))?
        .clone();
    let bin_idx = column_index(&headers, BIN_ID_HEADERS, path)?;
    let contig_idx = column_index(&headers, BIN_CONTIG_HEADERS, path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|err| table_parse(path, err))?;
        rows.push(BinRow {
            contig_id: format!("{contig_prefix}{}", &row[contig_idx]),
            bin_id: row[bin_idx].to_string(),
        });
    }
    Ok(rows)
}

// Lines with a single token declare no duplicates and are dropped here.
pub fn load_duplicate_map(path: &Utf8Path) -> Result<Vec<DuplicateGroup>, PfSplitError> {
    let text = read_input(path)?;
    let mut groups = Vec::new();
    for line in text.lines() {
        let tokens: Vec<&str> = line.trim_end().split('\t').collect();
        if tokens.len() < 2 {
            continue;
        }
        groups.push(DuplicateGroup {
            intact: OrfId::new(tokens[0]),
            duplicates: tokens[1..].iter().copied().map(OrfId::new).collect(),
        });
    }
    Ok(groups)
}

fn read_input(path: &Utf8Path) -> Result<String, PfSplitError> {
    fs::read_to_string(path.as_std_path()).map_err(|_| PfSplitError::InputRead(path.to_owned()))
}

fn column_index(
    headers: &csv::StringRecord,
    names: &[&str],
    path: &Utf8Path,
) -> Result<usize, PfSplitError> {
    headers
        .iter()
        .position(|header| names.contains(&header.trim()))
        .ok_or_else(|| PfSplitError::MissingColumn {
            column: names[0].to_string(),
            path: path.to_owned(),
        })
}

fn table_parse(path: &Utf8Path, err: csv::Error) -> PfSplitError {
    PfSplitError::TableParse {
        path: path.to_owned(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use assert_matches::assert_matches;
    use camino::Utf8PathBuf;

    use super::*;

    fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        fs::write(path.as_std_path(), content).unwrap();
        path
    }

    #[test]
    fn annotation_rows_gain_orf_prefix_and_drop_other_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "annotation.txt",
            "# ORF_ID\tLENGTH\tCONTIG_ID\n1_1\t300\tGAPP-s1_12\n2_4\t90\tGAPP-s1_13\n",
        );

        let rows = load_annotation_table(&path, DEFAULT_ORF_PREFIX).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].orf_id.as_str(), "O_1_1");
        assert_eq!(rows[0].contig_id, "GAPP-s1_12");
        assert_eq!(rows[1].orf_id.as_str(), "O_2_4");
    }

    #[test]
    fn annotation_missing_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "annotation.txt", "# ORF_ID\tLENGTH\n1_1\t300\n");

        let err = load_annotation_table(&path, DEFAULT_ORF_PREFIX).unwrap_err();
        assert_matches!(err, PfSplitError::MissingColumn { column, .. } if column == "CONTIG_ID");
    }

    #[test]
    fn bin_map_rows_gain_contig_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "contig_info.tsv",
            "UniteM Bin ID\tContig ID\tLength\nbin_1\ts1_12\t50000\n",
        );

        let rows = load_bin_map(&path, DEFAULT_CONTIG_PREFIX).unwrap();
        assert_eq!(
            rows,
            vec![BinRow {
                contig_id: "GAPP-s1_12".to_string(),
                bin_id: "bin_1".to_string(),
            }]
        );
    }

    #[test]
    fn bin_map_missing_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "contig_info.tsv", "Contig ID\tLength\ns1_12\t50000\n");

        let err = load_bin_map(&path, DEFAULT_CONTIG_PREFIX).unwrap_err();
        assert_matches!(err, PfSplitError::MissingColumn { column, .. } if column == "UniteM Bin ID");
    }

    #[test]
    fn duplicate_map_drops_single_token_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "orf_map.txt",
            "O_1_1\nO_2_4\tO_2_5\tO_2_6\nO_3_1\nO_4_2\tO_4_9\n",
        );

        let groups = load_duplicate_map(&path).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].intact.as_str(), "O_2_4");
        assert_eq!(
            groups[0]
                .duplicates
                .iter()
                .map(OrfId::as_str)
                .collect::<Vec<_>>(),
            vec!["O_2_5", "O_2_6"]
        );
        assert_eq!(groups[1].intact.as_str(), "O_4_2");
    }

    #[test]
    fn missing_file_surfaces_its_path() {
        let err = load_duplicate_map(Utf8Path::new("does/not/exist.txt")).unwrap_err();
        assert_matches!(err, PfSplitError::InputRead(path) if path.ends_with("exist.txt"));
    }
}
