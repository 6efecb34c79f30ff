/// jQuery-style codec: lists are written as repeated `key[]=value` pairs
///
/// `{tags: [a, b]}` ↔ `tags%5B%5D=a&tags%5B%5D=b`. Nested keys such as
/// `a[b]=c` stay literal keys.
use super::{decode_component, encode_component, raw_pairs, QueryMap, QueryValue, QuerystringCodec};
use crate::error::QuerystringError;

const ARRAY_SUFFIX: &str = "[]";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketCodec;

impl QuerystringCodec for BracketCodec {
    fn serialize(&self, params: &QueryMap) -> String {
        params
            .iter()
            .flat_map(|(key, value)| match value {
                QueryValue::Single(value) => {
                    vec![format!("{}={}", encode_component(key), encode_component(value))]
                }
                QueryValue::Multi(values) => {
                    let array_key = encode_component(&format!("{key}{ARRAY_SUFFIX}"));
                    values
                        .iter()
                        .map(|value| format!("{}={}", array_key, encode_component(value)))
                        .collect()
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    fn parse(&self, querystring: &str) -> Result<QueryMap, QuerystringError> {
        let mut params = QueryMap::new();

        for (raw_key, raw_value, position) in raw_pairs(querystring) {
            let key = decode_component(raw_key, position)?;
            let value = decode_component(raw_value, position + raw_key.len() + 1)?;

            match key.strip_suffix(ARRAY_SUFFIX) {
                Some("") => return Err(QuerystringError::EmptyKey { position }),
                Some(name) => params.append_multi(name, value),
                None if key.is_empty() => return Err(QuerystringError::EmptyKey { position }),
                None => params.append(key, value),
            }
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_lists_as_brackets() {
        let params = QueryMap::from([
            ("tags", QueryValue::from(["a", "b"])),
            ("page", QueryValue::from("2")),
        ]);
        assert_eq!(
            BracketCodec.serialize(&params),
            "page=2&tags%5B%5D=a&tags%5B%5D=b"
        );
    }

    #[test]
    fn test_serialize_drops_empty_lists() {
        let params = QueryMap::from([("tags", QueryValue::Multi(Vec::new()))]);
        assert_eq!(BracketCodec.serialize(&params), "");
    }

    #[test]
    fn test_parse_bracket_keys_always_yield_lists() {
        let params = BracketCodec.parse("one[]=x&tags%5B%5D=a&tags[]=b").unwrap();
        assert_eq!(params.get("one"), Some(&QueryValue::from(["x"])));
        assert_eq!(params.get("tags"), Some(&QueryValue::from(["a", "b"])));
    }

    #[test]
    fn test_parse_keeps_delimiter_literal() {
        let params = BracketCodec.parse("name=a%7Cb").unwrap();
        assert_eq!(params.get("name"), Some(&QueryValue::from("a|b")));
    }

    #[test]
    fn test_parse_nested_keys_stay_literal() {
        let params = BracketCodec.parse("a[b]=c").unwrap();
        assert_eq!(params.get_str("a[b]"), Some("c"));
    }

    #[test]
    fn test_parse_rejects_bare_brackets() {
        assert_eq!(
            BracketCodec.parse("[]=1"),
            Err(QuerystringError::EmptyKey { position: 0 })
        );
    }

    #[test]
    fn test_round_trip_single_element_list() {
        let params = QueryMap::from([("ids", QueryValue::from(["7"]))]);
        assert_eq!(BracketCodec.parse(&BracketCodec.serialize(&params)).unwrap(), params);
    }
}
