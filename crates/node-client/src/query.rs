//! # Request Encoding
//!
//! Outbound calls address `{service}/{method}` and carry positional
//! arguments as repeated `arg=` query parameters followed by named options.

use url::form_urlencoded;

/// One call against the node API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiRequest {
    /// Service segment, e.g. `show`.
    pub service: String,
    /// Method segment, e.g. `block`.
    pub method: String,
    /// Positional arguments, sent in order as `arg=<value>`.
    pub args: Vec<String>,
    /// Named options, sent after the arguments in insertion order.
    pub options: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request with no arguments or options.
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            args: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append several positional arguments.
    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// Append a named option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    /// Path below the API root: `{service}/{method}`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.service, self.method)
    }

    /// Encoded query string without the leading `?` (empty if none).
    pub fn query_string(&self) -> String {
        encode_query(&self.args, &self.options)
    }
}

/// Encode arguments and options into a query string.
///
/// Arguments become `arg=<v>` pairs; options follow after a literal `&`
/// when both are present.
pub fn encode_query(args: &[String], options: &[(String, String)]) -> String {
    let args_q = args
        .iter()
        .map(|a| format!("arg={}", encode_component(a)))
        .collect::<Vec<_>>()
        .join("&");

    let opts_q = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(options.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();

    match (args_q.is_empty(), opts_q.is_empty()) {
        (_, true) => args_q,
        (true, false) => opts_q,
        (false, false) => format!("{}&{}", args_q, opts_q),
    }
}

fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
