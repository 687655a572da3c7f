use crate::{request::InboundRequest, Error, Expectation};

/// The ordered expectations a server was created with.
///
/// The set never changes shape after construction. Only the invocation
/// counters of its expectations are mutated, by [select](RuleSet::select).
#[derive(Debug)]
pub(crate) struct RuleSet {
    expectations: Vec<Expectation>,
    paths: Vec<String>,
}

impl RuleSet {
    pub(crate) fn new(expectations: Vec<Expectation>) -> Self {
        let mut paths: Vec<String> = Vec::new();
        for expectation in &expectations {
            if !paths.contains(&expectation.path) {
                paths.push(expectation.path.clone());
            }
        }

        Self {
            expectations,
            paths,
        }
    }

    pub(crate) fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// Distinct expectation paths, in the order they were first registered.
    pub(crate) fn registered_paths(&self) -> &[String] {
        &self.paths
    }

    pub(crate) fn is_registered(&self, path: &str) -> bool {
        self.paths.iter().any(|registered| registered == path)
    }

    /// Finds the first expectation matching the request with budget left and
    /// claims one invocation of it. Returns its index.
    ///
    /// Expectations are scanned in registration order and the first candidate
    /// wins, even when a later one would match more specifically.
    pub(crate) fn select(&self, req: &InboundRequest) -> Result<Option<usize>, Error> {
        for (index, expectation) in self.expectations.iter().enumerate() {
            if !matches(expectation, req)? {
                continue;
            }

            if !expectation.try_claim() {
                tracing::debug!(
                    index,
                    max_match_count = expectation.max_match_count,
                    "expectation matched but its match budget is exhausted"
                );
                continue;
            }

            return Ok(Some(index));
        }

        Ok(None)
    }
}

fn matches(expectation: &Expectation, req: &InboundRequest) -> Result<bool, Error> {
    if expectation.path != req.path || expectation.method != req.method.as_str() {
        return Ok(false);
    }

    if let Some(body) = &expectation.body {
        if body.to_bytes()? != req.body {
            return Ok(false);
        }
    }

    for (name, pattern) in &expectation.headers {
        if !pattern.is_full_match(name, &req.header(name))? {
            return Ok(false);
        }
    }

    for (name, pattern) in &expectation.query_parameters {
        if !pattern.is_full_match(name, &req.form_value(name))? {
            return Ok(false);
        }
    }

    Ok(true)
}
