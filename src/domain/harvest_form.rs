use serde::{Deserialize, Deserializer};

/// Raw harvest fields exactly as submitted, before any validation.
///
/// Every field is optional so that a missing value can be itemized instead of
/// failing deserialization. Clients may send numbers either as JSON numbers or
/// as strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestForm {
    /// **Format:** `YYYY-MM-DD`
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub date: Option<String>,

    /// One of `raspberry`, `strawberry`, `apple`, `cherry`
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub fruit: Option<String>,

    /// Harvested amount in kg
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub amount: Option<String>,

    /// Price per kg
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub price: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Number(number) => number.to_string(),
    }))
}
