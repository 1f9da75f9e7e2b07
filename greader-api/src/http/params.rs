//! Query-string and form-body parameters.
//!
//! Clients repeat fields (`i`, `s`, `t`) without the `[]` suffix, so every
//! pair is kept in order instead of collapsing into a map.

use greader_core::{parse_continuation, EntryFilter, PageWindow};

use crate::query::{Listing, DEFAULT_PAGE_SIZE};
use crate::storage::SortOrder;

/// Decoded `application/x-www-form-urlencoded` pairs.
#[derive(Debug, Clone, Default)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Parse an urlencoded string or body.
    pub fn parse(input: &[u8]) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(input).into_owned().collect(),
        }
    }

    /// The last value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value of `name`, in order.
    pub fn all(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Whether `name` is present at all.
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    /// All pairs, in order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Parameters of one request: the query string and the form body.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    query: Params,
    form: Params,
}

impl RequestParams {
    /// Parse the raw query string and body.
    pub fn new(query: Option<&str>, body: &[u8]) -> Self {
        Self {
            query: Params::parse(query.unwrap_or_default().as_bytes()),
            form: Params::parse(body),
        }
    }

    /// Query-string parameters.
    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Form-body parameters.
    pub fn form(&self) -> &Params {
        &self.form
    }

    /// A parameter from either source, the form body winning.
    pub fn request(&self, name: &str) -> Option<&str> {
        self.form.get(name).or_else(|| self.query.get(name))
    }

    /// Repeated field of `subscription/edit` (`s`, `t`): the form values,
    /// unless the form carries no non-empty value and the query has one.
    pub fn repeated_with_query_fallback(&self, name: &str) -> Vec<String> {
        let form_empty = self.form.get(name).map_or(true, str::is_empty);
        match self.query.get(name) {
            Some(value) if form_empty => vec![value.to_string()],
            _ => self.form.all(name),
        }
    }

    /// Filter, order and window of a listing, from the query string.
    ///
    /// An unparsable `n` falls back to the default page size; `ot`/`nt`
    /// that do not parse mean "unbounded".
    pub fn listing(&self) -> Listing {
        let query = &self.query;
        let count = query
            .get("n")
            .map(|raw| match raw.trim().parse::<i64>() {
                Ok(n) => n.clamp(1, i64::from(u32::MAX)) as u32,
                Err(_) => DEFAULT_PAGE_SIZE,
            })
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let start = seconds(query.get("ot"));
        let stop = seconds(query.get("nt"));

        Listing {
            filter: EntryFilter::compile(
                query.get("it").unwrap_or_default(),
                query.get("xt").unwrap_or_default(),
                start,
                stop,
            ),
            order: SortOrder::from_param(query.get("r")),
            window: PageWindow::new(count, query.get("c").and_then(parse_continuation)),
        }
    }
}

fn seconds(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
}
