use std::fmt;

use serde::Serialize;

use crate::error::PfSplitError;

pub const RECORD_TERMINATOR: &str = "//";

const ID_FIELD: &str = "ID";
const NAME_FIELD: &str = "NAME";
const STARTBASE_FIELD: &str = "STARTBASE";
const ENDBASE_FIELD: &str = "ENDBASE";
const FUNCTION_FIELD: &str = "FUNCTION";
const PRODUCT_TYPE_FIELD: &str = "PRODUCT-TYPE";
const METACYC_FIELD: &str = "METACYC";
const EC_FIELD: &str = "EC";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrfId(String);

impl OrfId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrfId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub orf_id: OrfId,
    pub name: Option<String>,
    pub start_base: Option<String>,
    pub end_base: Option<String>,
    pub function: Option<String>,
    pub product_type: Option<String>,
    pub metacyc_ids: Vec<String>,
    pub ec_numbers: Vec<String>,
    pub extra: Vec<(String, String)>,
}

#[derive(Default)]
struct PendingRecord {
    first_line: usize,
    orf_id: Option<String>,
    name: Option<String>,
    start_base: Option<String>,
    end_base: Option<String>,
    function: Option<String>,
    product_type: Option<String>,
    metacyc_ids: Vec<String>,
    ec_numbers: Vec<String>,
    extra: Vec<(String, String)>,
}

impl PendingRecord {
    fn new(first_line: usize) -> Self {
        Self {
            first_line,
            ..Self::default()
        }
    }

    fn push_field(&mut self, field_type: &str, payload: &str) {
        match field_type {
            METACYC_FIELD => self.metacyc_ids.push(payload.to_string()),
            EC_FIELD => self.ec_numbers.push(payload.to_string()),
            ID_FIELD => self.orf_id = Some(payload.to_string()),
            NAME_FIELD => self.name = Some(payload.to_string()),
            STARTBASE_FIELD => self.start_base = Some(payload.to_string()),
            ENDBASE_FIELD => self.end_base = Some(payload.to_string()),
            FUNCTION_FIELD => self.function = Some(payload.to_string()),
            PRODUCT_TYPE_FIELD => self.product_type = Some(payload.to_string()),
            other => {
                match self.extra.iter_mut().find(|(key, _)| key == other) {
                    Some(slot) => slot.1 = payload.to_string(),
                    None => self.extra.push((other.to_string(), payload.to_string())),
                }
            }
        }
    }

    fn finish(self, terminator_line: usize) -> Result<Record, PfSplitError> {
        let orf_id = self.orf_id.ok_or(PfSplitError::RecordWithoutId {
            line: terminator_line,
        })?;
        Ok(Record {
            orf_id: OrfId::new(orf_id),
            name: self.name,
            start_base: self.start_base,
            end_base: self.end_base,
            function: self.function,
            product_type: self.product_type,
            metacyc_ids: self.metacyc_ids,
            ec_numbers: self.ec_numbers,
            extra: self.extra,
        })
    }
}

pub fn parse_records(text: &str) -> Result<Vec<Record>, PfSplitError> {
    let mut records = Vec::new();
    let mut pending: Option<PendingRecord> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.trim_end();

        if line == RECORD_TERMINATOR {
            let record = pending
                .take()
                .unwrap_or_else(|| PendingRecord::new(line_number));
            records.push(record.finish(line_number)?);
            continue;
        }

        let (field_type, payload) = line
            .split_once('\t')
            .ok_or(PfSplitError::UnseparatedField { line: line_number })?;
        pending
            .get_or_insert_with(|| PendingRecord::new(line_number))
            .push_field(field_type, payload);
    }

    if let Some(record) = pending {
        return Err(PfSplitError::UnterminatedRecord {
            line: record.first_line,
        });
    }

    Ok(records)
}

pub fn render_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> String {
    let mut out = String::new();
    for record in records {
        render_record(record, &mut out);
    }
    out
}

fn render_record(record: &Record, out: &mut String) {
    push_field(out, ID_FIELD, record.orf_id.as_str());
    push_optional(out, NAME_FIELD, record.name.as_deref());
    push_optional(out, STARTBASE_FIELD, record.start_base.as_deref());
    push_optional(out, ENDBASE_FIELD, record.end_base.as_deref());
    push_optional(out, FUNCTION_FIELD, record.function.as_deref());
    for (field_type, payload) in &record.extra {
        push_field(out, field_type, payload);
    }
    for metacyc in &record.metacyc_ids {
        push_field(out, METACYC_FIELD, metacyc);
    }
    for ec in &record.ec_numbers {
        push_field(out, EC_FIELD, ec);
    }
    push_optional(out, PRODUCT_TYPE_FIELD, record.product_type.as_deref());
    out.push_str(RECORD_TERMINATOR);
    out.push('\n');
}

fn push_field(out: &mut String, field_type: &str, payload: &str) {
    out.push_str(field_type);
    out.push('\t');
    out.push_str(payload);
    out.push('\n');
}

fn push_optional(out: &mut String, field_type: &str, payload: Option<&str>) {
    if let Some(payload) = payload {
        push_field(out, field_type, payload);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn record_text() -> &'static str {
        "ID\tO_1_1\n\
         NAME\tO_1_1\n\
         STARTBASE\t10\n\
         ENDBASE\t400\n\
         FUNCTION\tputative oxidoreductase\n\
         METACYC\tRXN-11234\n\
         EC\t1.1.1.1\n\
         EC\t1.1.1.2\n\
         PRODUCT-TYPE\tP\n\
         //\n"
    }

    #[test]
    fn parse_single_record() {
        let records = parse_records(record_text()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.orf_id.as_str(), "O_1_1");
        assert_eq!(record.name.as_deref(), Some("O_1_1"));
        assert_eq!(record.start_base.as_deref(), Some("10"));
        assert_eq!(record.end_base.as_deref(), Some("400"));
        assert_eq!(record.function.as_deref(), Some("putative oxidoreductase"));
        assert_eq!(record.product_type.as_deref(), Some("P"));
        assert_eq!(record.metacyc_ids, vec!["RXN-11234"]);
        assert_eq!(record.ec_numbers, vec!["1.1.1.1", "1.1.1.2"]);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn multi_valued_fields_keep_occurrence_order() {
        let text = "ID\tO_2_9\nEC\t2.7.7.7\nMETACYC\tRXN-1\nEC\t3.1.1.1\nMETACYC\tRXN-2\n//\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records[0].ec_numbers, vec!["2.7.7.7", "3.1.1.1"]);
        assert_eq!(records[0].metacyc_ids, vec!["RXN-1", "RXN-2"]);
    }

    #[test]
    fn unknown_field_overwrites_by_type() {
        let text = "ID\tO_3_2\nGENE\tabc\nGENE\tdef\nNOTE\tkeep\n//\n";
        let records = parse_records(text).unwrap();
        assert_eq!(
            records[0].extra,
            vec![
                ("GENE".to_string(), "def".to_string()),
                ("NOTE".to_string(), "keep".to_string()),
            ]
        );
    }

    #[test]
    fn line_without_tab_is_rejected() {
        let err = parse_records("ID\tO_1_1\nBROKEN LINE\n//\n").unwrap_err();
        assert_matches!(err, PfSplitError::UnseparatedField { line: 2 });
    }

    #[test]
    fn missing_terminator_is_rejected() {
        let err = parse_records("ID\tO_1_1\nNAME\tO_1_1\n").unwrap_err();
        assert_matches!(err, PfSplitError::UnterminatedRecord { line: 1 });
    }

    #[test]
    fn record_without_id_is_rejected() {
        let err = parse_records("NAME\tO_1_1\n//\n").unwrap_err();
        assert_matches!(err, PfSplitError::RecordWithoutId { line: 2 });
    }

    #[test]
    fn render_round_trips() {
        let records = parse_records(record_text()).unwrap();
        let rendered = render_records(&records);
        assert_eq!(parse_records(&rendered).unwrap(), records);
    }

    #[test]
    fn render_skips_absent_scalar_slots() {
        let records = parse_records("ID\tO_5_5\nEC\t1.2.3.4\n//\n").unwrap();
        let rendered = render_records(&records);
        assert_eq!(rendered, "ID\tO_5_5\nEC\t1.2.3.4\n//\n");
    }
}
