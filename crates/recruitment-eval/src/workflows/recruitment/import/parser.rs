use std::io::Read;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreSheetRow {
    #[serde(rename = "Juror")]
    pub(crate) juror: String,
    #[serde(rename = "Phase")]
    pub(crate) phase: u8,
    #[serde(rename = "Score")]
    pub(crate) score: String,
    #[serde(rename = "Presentation", default, deserialize_with = "empty_string_as_none")]
    pub(crate) presentation: Option<String>,
    #[serde(rename = "Verbal", default, deserialize_with = "empty_string_as_none")]
    pub(crate) verbal: Option<String>,
    #[serde(rename = "Voice", default, deserialize_with = "empty_string_as_none")]
    pub(crate) voice: Option<String>,
    #[serde(rename = "Appetence", default, deserialize_with = "empty_string_as_none")]
    pub(crate) appetence: Option<String>,
    #[serde(rename = "Decision", default, deserialize_with = "empty_string_as_none")]
    pub(crate) decision: Option<String>,
}

/// Rows with their 1-based line number (the header is line 1).
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<(usize, ScoreSheetRow)>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<ScoreSheetRow>().enumerate() {
        rows.push((index + 2, record?));
    }

    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
