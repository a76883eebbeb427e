use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Raw CSV row as exported by the front-desk cash book.
#[derive(Debug, Deserialize)]
pub(crate) struct CashBookRow {
    #[serde(rename = "Date")]
    pub(crate) date: String,
    #[serde(rename = "Type")]
    pub(crate) kind: String,
    #[serde(rename = "Category")]
    pub(crate) category: String,
    #[serde(rename = "Amount")]
    pub(crate) amount: String,
    #[serde(rename = "Description", default)]
    pub(crate) description: String,
    #[serde(
        rename = "Payment Method",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) payment_method: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<CashBookRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<CashBookRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
