/// Default codec: lists are joined into one value with a delimiter
///
/// `{tags: [a, b], page: 2}` ↔ `page=2&tags=a%7Cb` with the default `|`.
use super::{decode_component, encode_component, raw_pairs, QueryMap, QueryValue, QuerystringCodec};
use super::DEFAULT_ARRAY_DELIMITER;
use crate::error::QuerystringError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedCodec {
    delimiter: String,
}

impl DelimitedCodec {
    /// Creates a codec splitting lists on `delimiter`
    ///
    /// An empty delimiter disables splitting on parse.
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    fn split_value(&self, value: String) -> QueryValue {
        if self.delimiter.is_empty() || !value.contains(self.delimiter.as_str()) {
            return QueryValue::Single(value);
        }
        QueryValue::Multi(value.split(self.delimiter.as_str()).map(str::to_string).collect())
    }
}

impl Default for DelimitedCodec {
    fn default() -> Self {
        Self::new(DEFAULT_ARRAY_DELIMITER)
    }
}

impl QuerystringCodec for DelimitedCodec {
    fn serialize(&self, params: &QueryMap) -> String {
        params
            .iter()
            .filter(|(_, value)| !matches!(value, QueryValue::Multi(values) if values.is_empty()))
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    encode_component(key),
                    encode_component(&value.join(&self.delimiter))
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    fn parse(&self, querystring: &str) -> Result<QueryMap, QuerystringError> {
        let mut params = QueryMap::new();

        for (raw_key, raw_value, position) in raw_pairs(querystring) {
            let key = decode_component(raw_key, position)?;
            if key.is_empty() {
                return Err(QuerystringError::EmptyKey { position });
            }
            let value = decode_component(raw_value, position + raw_key.len() + 1)?;

            match self.split_value(value) {
                QueryValue::Single(value) => params.append(key, value),
                QueryValue::Multi(values) => {
                    for value in values {
                        params.append_multi(key.clone(), value);
                    }
                }
            }
        }

        Ok(params)
    }

    fn array_delimiter(&self) -> &str {
        &self.delimiter
    }
}
