//! Data requests and per-load request plans.

use std::collections::HashSet;

use serde_json::Value;
use storefront_data::{QueryDescriptor, Variables};

use crate::error::PlanError;

/// Whether the page may render without a request's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criticality {
    /// Page rendering blocks on this request.
    Critical,
    /// Page renders without it; the section streams in later.
    Deferred,
}

/// One unit of data a page needs.
///
/// Criticality is fixed when the request is constructed.
#[derive(Debug, Clone)]
pub struct DataRequest {
    name: String,
    criticality: Criticality,
    query: QueryDescriptor,
    variables: Variables,
}

impl DataRequest {
    /// Create a request.
    pub fn new(name: impl Into<String>, criticality: Criticality, query: QueryDescriptor) -> Self {
        Self {
            name: name.into(),
            criticality,
            query,
            variables: Variables::new(),
        }
    }

    /// Create a critical request.
    pub fn critical(name: impl Into<String>, query: QueryDescriptor) -> Self {
        Self::new(name, Criticality::Critical, query)
    }

    /// Create a deferred request.
    pub fn deferred(name: impl Into<String>, query: QueryDescriptor) -> Self {
        Self::new(name, Criticality::Deferred, query)
    }

    /// Set one variable.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Merge a set of variables, overwriting existing keys.
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables.extend(variables);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn criticality(&self) -> Criticality {
        self.criticality
    }

    pub fn is_critical(&self) -> bool {
        self.criticality == Criticality::Critical
    }

    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }
}

/// Ordered set of requests for one page load.
///
/// Names are unique within a plan.
#[derive(Debug, Clone, Default)]
pub struct LoadPlan {
    requests: Vec<DataRequest>,
    names: HashSet<String>,
}

impl LoadPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from requests in declaration order.
    pub fn from_requests(
        requests: impl IntoIterator<Item = DataRequest>,
    ) -> Result<Self, PlanError> {
        let mut plan = Self::new();
        for request in requests {
            plan.push(request)?;
        }
        Ok(plan)
    }

    /// Append a request.
    pub fn push(&mut self, request: DataRequest) -> Result<&mut Self, PlanError> {
        if !self.names.insert(request.name.clone()) {
            return Err(PlanError::DuplicateName(request.name));
        }
        self.requests.push(request);
        Ok(self)
    }

    /// Append a request, builder style.
    pub fn with(mut self, request: DataRequest) -> Result<Self, PlanError> {
        self.push(request)?;
        Ok(self)
    }

    pub fn requests(&self) -> &[DataRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn into_requests(self) -> Vec<DataRequest> {
        self.requests
    }
}
