//! Translation of query-string parameters into a store query directive
//!
//! Rules:
//!
//! - Without a configured sort parameter, any key of the form `sort(<terms>)`
//!   carries the sort (`?sort(+name,-age)`). With one configured, only the key
//!   equal to that name does, and its value carries the terms
//!   (`?sortBy=+name,-age`).
//! - A term starting with `+` or a space is ascending, one starting with `-` is
//!   descending, anything else is dropped. A space shows up because `+`
//!   decodes to a space in query strings.
//! - Every other parameter is an equality filter.
//! - `Range: items=<start>-<end>` selects a window; any other form is ignored.
//!   The bounds are echoed in `Content-Range` exactly as sent.
//!
//! # Example
//!
//! ```rust
//! use json_rest_store::rest::QueryTranslator;
//! use json_rest_store::store::SortDirection;
//!
//! let params = vec![
//!     ("status".to_string(), "active".to_string()),
//!     ("sort(+name,-age)".to_string(), String::new()),
//! ];
//! let directive = QueryTranslator::new().translate(&params, Some("items=0-9"));
//!
//! assert_eq!(directive.filters.get("status").map(String::as_str), Some("active"));
//! assert_eq!(directive.sort.get("age"), Some(SortDirection::Descending));
//! assert_eq!(directive.range.map(|r| r.items.end), Some(9));
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::store::{Filters, ItemRange, SortDirection, SortSpec};

static SORT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sort\((.+)\)$").expect("sort key pattern is valid"));

static ITEMS_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^items=([0-9]+)-([0-9]+)$").expect("range pattern is valid")
});

/// Filters, sort and range derived from one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDirective {
    /// Field to exact string value
    pub filters: Filters,
    /// Sort terms in priority order
    pub sort: SortSpec,
    /// Requested item window, when a well-formed `Range` header was sent
    pub range: Option<RangeRequest>,
}

/// A well-formed `Range: items=<start>-<end>` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    /// Window handed to the store; bounds past `u64::MAX` saturate
    pub items: ItemRange,
    start: String,
    end: String,
}

impl RangeRequest {
    /// `Content-Range` value with the bounds as the client wrote them
    pub fn content_range(&self, total: u64) -> String {
        format!("items {}-{}/{}", self.start, self.end, total)
    }
}

/// Builds [`QueryDirective`]s; holds the optional sort parameter override
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTranslator {
    sort_param: Option<String>,
}

impl QueryTranslator {
    /// Translator that recognizes `sort(...)` keys
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translator that only treats the parameter named `name` as the sort
    #[must_use]
    pub fn with_sort_param(name: impl Into<String>) -> Self {
        Self {
            sort_param: Some(name.into()),
        }
    }

    /// The configured sort parameter override, if any
    #[must_use]
    pub fn sort_param(&self) -> Option<&str> {
        self.sort_param.as_deref()
    }

    /// Translate query parameters (in received order) and the raw `Range`
    /// header value into a directive
    pub fn translate(&self, params: &[(String, String)], range: Option<&str>) -> QueryDirective {
        let mut directive = QueryDirective {
            range: range.and_then(parse_range),
            ..QueryDirective::default()
        };

        for (key, value) in params {
            if let Some(terms) = self.sort_terms(key, value) {
                parse_sort_terms(terms, &mut directive.sort);
                continue;
            }
            directive.filters.insert(key.clone(), value.clone());
        }

        directive
    }

    /// The comma-separated term list if this parameter is the sort directive
    fn sort_terms<'a>(&self, key: &'a str, value: &'a str) -> Option<&'a str> {
        match &self.sort_param {
            Some(name) => (name == key).then_some(value),
            None => SORT_KEY
                .captures(key)
                .and_then(|captures| captures.get(1))
                .map(|terms| terms.as_str()),
        }
    }
}

fn parse_sort_terms(terms: &str, sort: &mut SortSpec) {
    for term in terms.split(',') {
        let mut chars = term.chars();
        let direction = match chars.next() {
            Some('+' | ' ') => SortDirection::Ascending,
            Some('-') => SortDirection::Descending,
            _ => continue,
        };
        // A bare sign leaves an empty field name; it is passed through as is.
        sort.insert(chars.as_str(), direction);
    }
}

/// Parse a `Range` header of the exact form `items=<start>-<end>`
///
/// Returns `None` for anything else.
///
/// ```rust
/// use json_rest_store::rest::parse_range;
/// use json_rest_store::store::ItemRange;
///
/// let range = parse_range("items=0-24").unwrap();
/// assert_eq!(range.items, ItemRange::new(0, 24));
/// assert_eq!(range.content_range(100), "items 0-24/100");
/// assert_eq!(parse_range("bytes=0-24"), None);
/// ```
pub fn parse_range(header: &str) -> Option<RangeRequest> {
    let captures = ITEMS_RANGE.captures(header)?;
    let start = captures.get(1)?.as_str();
    let end = captures.get(2)?.as_str();
    Some(RangeRequest {
        items: ItemRange::new(bound(start), bound(end)),
        start: start.to_string(),
        end: end.to_string(),
    })
}

// Only ASCII digits reach here, so the sole parse failure is overflow.
fn bound(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sort_terms(directive: &QueryDirective) -> Vec<(String, i8)> {
        directive
            .sort
            .iter()
            .map(|(field, direction)| (field.to_string(), direction.as_i8()))
            .collect()
    }

    #[test]
    fn test_sort_key_is_consumed() {
        let directive =
            QueryTranslator::new().translate(&params(&[("sort(a,-b)", "")]), None);

        // "a" has no sign character, so only "b" survives
        assert_eq!(sort_terms(&directive), vec![("b".to_string(), -1)]);
        assert!(directive.filters.is_empty());
    }

    #[test]
    fn test_sort_with_signs() {
        let directive = QueryTranslator::new()
            .translate(&params(&[("sort(+a,-b)", ""), ("x", "1")]), None);

        assert_eq!(
            sort_terms(&directive),
            vec![("a".to_string(), 1), ("b".to_string(), -1)]
        );
        assert_eq!(directive.filters.len(), 1);
        assert_eq!(directive.filters["x"], "1");
    }

    #[test]
    fn test_decoded_plus_means_ascending() {
        let directive =
            QueryTranslator::new().translate(&params(&[("sort( name,-age)", "")]), None);
        assert_eq!(directive.sort.get("name"), Some(SortDirection::Ascending));
        assert_eq!(directive.sort.get("age"), Some(SortDirection::Descending));
    }

    #[test]
    fn test_unsigned_terms_are_dropped() {
        let directive =
            QueryTranslator::new().translate(&params(&[("sort(name,*age,,+ok)", "")]), None);
        assert_eq!(sort_terms(&directive), vec![("ok".to_string(), 1)]);
    }

    #[test]
    fn test_bare_sign_inserts_empty_field() {
        let directive = QueryTranslator::new().translate(&params(&[("sort(-)", "")]), None);
        assert_eq!(directive.sort.get(""), Some(SortDirection::Descending));
    }

    #[test]
    fn test_later_duplicate_overwrites_direction() {
        let directive = QueryTranslator::new()
            .translate(&params(&[("sort(+a)", ""), ("sort(-a)", "")]), None);
        assert_eq!(sort_terms(&directive), vec![("a".to_string(), -1)]);
    }

    #[test]
    fn test_empty_sort_parens_is_a_filter() {
        let directive = QueryTranslator::new().translate(&params(&[("sort()", "")]), None);
        assert!(directive.sort.is_empty());
        assert_eq!(directive.filters.get("sort()").map(String::as_str), Some(""));
    }

    #[test]
    fn test_override_only_matches_exact_key() {
        let translator = QueryTranslator::with_sort_param("sortBy");
        let directive = translator.translate(
            &params(&[("sortBy", "+name,-age"), ("sort(-x)", ""), ("status", "open")]),
            None,
        );

        assert_eq!(
            sort_terms(&directive),
            vec![("name".to_string(), 1), ("age".to_string(), -1)]
        );
        assert_eq!(directive.filters.len(), 2);
        assert_eq!(directive.filters["sort(-x)"], "");
        assert_eq!(directive.filters["status"], "open");
        assert_eq!(translator.sort_param(), Some("sortBy"));
    }

    #[test]
    fn test_filters_keep_last_value_for_repeated_key() {
        let directive = QueryTranslator::new()
            .translate(&params(&[("tag", "a"), ("tag", "b")]), None);
        assert_eq!(directive.filters["tag"], "b");
    }

    #[test]
    fn test_range_parsed() {
        let directive = QueryTranslator::new().translate(&[], Some("items=0-9"));
        assert_eq!(directive.range.map(|r| r.items), Some(ItemRange::new(0, 9)));
    }

    #[test]
    fn test_range_bounds_echo_as_sent() {
        let range = parse_range("items=007-9").unwrap();
        assert_eq!(range.items, ItemRange::new(7, 9));
        assert_eq!(range.content_range(12), "items 007-9/12");
    }

    #[test]
    fn test_oversized_range_bounds_saturate() {
        let range = parse_range("items=99999999999999999999999-1").unwrap();
        assert_eq!(range.items, ItemRange::new(u64::MAX, 1));
        assert_eq!(range.content_range(0), "items 99999999999999999999999-1/0");
    }

    #[test]
    fn test_malformed_range_is_absent() {
        for header in [
            "items=0-",
            "items=-9",
            "items=a-b",
            "items 0-9",
            "bytes=0-9",
            " items=0-9",
            "items=0-9 ",
            "items=0-9,20-29",
            "",
        ] {
            assert_eq!(parse_range(header), None, "{:?} should not parse", header);
        }
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert_eq!(parse_range("items=\u{0661}-\u{0662}"), None);
    }

    #[test]
    fn test_no_params_no_range() {
        let directive = QueryTranslator::new().translate(&[], None);
        assert_eq!(directive, QueryDirective::default());
    }
}
