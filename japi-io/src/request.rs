//! JSON-API request query parameters
//!
//! Parses the raw query string of a request into the parameters JSON-API
//! clients use to shape a response: `filters[key]=a,b`, `include=a,b`,
//! `sort=a,-b`, `fields[type]=a,b`, `page[limit]` and `page[offset]`.

use crate::inflector::singularize;
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use tracing::warn;

/// One entry of the `sort` parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Field name without the direction prefix
    pub field: String,
    /// `-field` sorts descending
    pub descending: bool,
}

/// Decoded query parameters of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonApiRequest {
    params: Vec<(String, Option<String>, String)>,
}

impl JsonApiRequest {
    /// Parse a raw query string (with or without the leading `?`)
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                let key = decode(key);
                let (name, sub) = split_bracket_key(&key);
                (name, sub, decode(value))
            })
            .collect();

        Self { params }
    }

    /// Last value of a plain parameter
    fn value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(n, sub, _)| n == name && sub.is_none())
            .map(|(_, _, v)| v.as_str())
    }

    /// Values of a bracketed parameter family, last occurrence per key winning
    fn family(&self, name: &str) -> BTreeMap<String, String> {
        self.params
            .iter()
            .filter(|(n, _, _)| n == name)
            .filter_map(|(_, sub, v)| sub.as_ref().map(|sub| (sub.clone(), v.clone())))
            .collect()
    }

    /// `filters[key]=v1,v2` as trimmed value lists per key
    pub fn filters(&self) -> BTreeMap<String, Vec<String>> {
        self.family("filters")
            .into_iter()
            .map(|(key, value)| (key, split_list(&value)))
            .collect()
    }

    /// Requested relationships, each followed by its singular form, without duplicates
    pub fn included_relationships(&self) -> Vec<String> {
        let Some(include) = self.value("include") else {
            return Vec::new();
        };

        let mut included: Vec<String> = Vec::new();
        for item in split_list(include).into_iter().filter(|i| !i.is_empty()) {
            let singular = singularize(&item);
            for candidate in [item, singular] {
                if !included.contains(&candidate) {
                    included.push(candidate);
                }
            }
        }
        included
    }

    /// `page[limit]`, or `default` when absent or unparsable
    pub fn pagination_limit(&self, default: u64) -> u64 {
        self.page_param("limit").unwrap_or(default)
    }

    /// `page[offset]`, or zero when absent or unparsable
    pub fn pagination_offset(&self) -> u64 {
        self.page_param("offset").unwrap_or(0)
    }

    /// Raw `sort` entries in request order
    pub fn sort(&self) -> Vec<String> {
        match self.value("sort") {
            Some(sort) if !sort.is_empty() => split_list(sort),
            _ => Vec::new(),
        }
    }

    /// `sort` entries split into field and direction
    pub fn sort_fields(&self) -> Vec<SortField> {
        self.sort()
            .into_iter()
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.strip_prefix('-') {
                Some(field) => SortField {
                    field: field.to_string(),
                    descending: true,
                },
                None => SortField {
                    field: entry,
                    descending: false,
                },
            })
            .collect()
    }

    /// Sparse fieldsets: `fields[type]=f1,f2`; empty values are ignored
    pub fn fields(&self) -> BTreeMap<String, Vec<String>> {
        self.family("fields")
            .into_iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(resource_type, members)| (resource_type, split_list(&members)))
            .collect()
    }

    fn page_param(&self, key: &str) -> Option<u64> {
        let raw = self.family("page").remove(key)?;
        match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(parameter = key, value = raw.as_str(), "ignoring unparsable page parameter");
                None
            }
        }
    }
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy().into_owned()
}

fn split_bracket_key(key: &str) -> (String, Option<String>) {
    match key.split_once('[') {
        Some((name, rest)) if rest.ends_with(']') => {
            (name.to_string(), Some(rest[..rest.len() - 1].to_string()))
        }
        _ => (key.to_string(), None),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|item| item.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_are_split_and_trimmed() {
        let request = JsonApiRequest::parse("filters[author]=1,%202&filters[tag]=rust");
        let filters = request.filters();
        assert_eq!(filters["author"], vec!["1", "2"]);
        assert_eq!(filters["tag"], vec!["rust"]);
    }

    #[test]
    fn include_adds_singular_forms() {
        let request = JsonApiRequest::parse("?include=comments,author,,%20tags");
        assert_eq!(
            request.included_relationships(),
            vec!["comments", "comment", "author", "tags", "tag"]
        );
        assert!(JsonApiRequest::parse("").included_relationships().is_empty());
    }

    #[test]
    fn pagination_defaults() {
        let request = JsonApiRequest::parse("page[limit]=25&page[offset]=50");
        assert_eq!(request.pagination_limit(10), 25);
        assert_eq!(request.pagination_offset(), 50);

        let request = JsonApiRequest::parse("page[limit]=lots");
        assert_eq!(request.pagination_limit(10), 10);
        assert_eq!(request.pagination_offset(), 0);
    }

    #[test]
    fn encoded_brackets_are_understood() {
        let request = JsonApiRequest::parse("page%5Blimit%5D=5");
        assert_eq!(request.pagination_limit(10), 5);
    }

    #[test]
    fn sort_keeps_direction_prefixes() {
        let request = JsonApiRequest::parse("sort=title,+-created");
        assert_eq!(request.sort(), vec!["title", "-created"]);
        assert_eq!(
            request.sort_fields(),
            vec![
                SortField {
                    field: "title".to_string(),
                    descending: false
                },
                SortField {
                    field: "created".to_string(),
                    descending: true
                },
            ]
        );
        assert!(JsonApiRequest::parse("sort=").sort().is_empty());
    }

    #[test]
    fn sparse_fieldsets_skip_empty_values() {
        let request = JsonApiRequest::parse("fields[articles]=title,%20body&fields[people]=");
        let fields = request.fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["articles"], vec!["title", "body"]);
    }

    #[test]
    fn last_occurrence_wins() {
        let request = JsonApiRequest::parse("include=a&include=b");
        assert_eq!(request.included_relationships(), vec!["b"]);
    }
}
