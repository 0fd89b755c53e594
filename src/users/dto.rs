use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub rating: f64,
}

// Accepts `4.5` as well as `"4.5"`.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("rating is not a number: {s:?}")))?,
    };
    if !value.is_finite() {
        return Err(de::Error::custom("rating must be a finite number"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_number() {
        let req: UpdateRatingRequest = serde_json::from_str(r#"{"rating": 5.0}"#).unwrap();
        assert_eq!(req.rating, 5.0);

        let req: UpdateRatingRequest = serde_json::from_str(r#"{"rating": 3}"#).unwrap();
        assert_eq!(req.rating, 3.0);
    }

    #[test]
    fn rating_coerces_numeric_string() {
        let req: UpdateRatingRequest = serde_json::from_str(r#"{"rating": " 4.5 "}"#).unwrap();
        assert_eq!(req.rating, 4.5);
    }

    #[test]
    fn rating_rejects_non_numeric() {
        assert!(serde_json::from_str::<UpdateRatingRequest>(r#"{"rating": "great"}"#).is_err());
        assert!(serde_json::from_str::<UpdateRatingRequest>(r#"{"rating": "NaN"}"#).is_err());
        assert!(serde_json::from_str::<UpdateRatingRequest>(r#"{"rating": true}"#).is_err());
        assert!(serde_json::from_str::<UpdateRatingRequest>(r#"{}"#).is_err());
    }
}
