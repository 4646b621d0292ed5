//! Endpoint aggregation

use super::normalize::normalize_url;
use super::types::{endpoint_key, EndpointAggregate};
use crate::exchange::CapturedExchange;
use crate::schema::{merge_into, SchemaBuilder};
use crate::types::OrderedMap;
use tracing::debug;

/// Group exchanges into endpoints using default schema settings
pub fn aggregate_endpoints(exchanges: &[CapturedExchange]) -> Vec<EndpointAggregate> {
    aggregate_endpoints_with(exchanges, &SchemaBuilder::new())
}

/// Group exchanges by (method, normalized URL).
///
/// Every exchange lands in exactly one aggregate. Output is sorted by
/// domain, then path; ties keep first-seen order.
pub fn aggregate_endpoints_with(
    exchanges: &[CapturedExchange],
    builder: &SchemaBuilder,
) -> Vec<EndpointAggregate> {
    let mut groups: OrderedMap<EndpointAggregate> = OrderedMap::new();

    for (index, exchange) in exchanges.iter().enumerate() {
        let method = exchange.method.to_ascii_uppercase();
        let pattern = normalize_url(&exchange.url);
        let key = endpoint_key(&method, &pattern);

        let aggregate = groups.get_or_insert_with(&key, || {
            let path = match exchange.parsed_url() {
                Some(_) => exchange.path(),
                None => "/".to_string(),
            };
            EndpointAggregate::new(&method, &pattern, exchange.domain_or_unknown(), path)
        });
        record_exchange(aggregate, index, exchange, builder);
    }

    let mut aggregates: Vec<EndpointAggregate> = groups
        .into_iter()
        .map(|(_, mut aggregate)| {
            aggregate.avg_response_time = average_time(exchanges, &aggregate.exchange_indices);
            aggregate
        })
        .collect();

    aggregates.sort_by(|a, b| a.domain.cmp(&b.domain).then_with(|| a.path.cmp(&b.path)));

    debug!(
        "Aggregated {} exchanges into {} endpoints",
        exchanges.len(),
        aggregates.len()
    );
    aggregates
}

fn record_exchange(
    aggregate: &mut EndpointAggregate,
    index: usize,
    exchange: &CapturedExchange,
    builder: &SchemaBuilder,
) {
    aggregate.exchange_indices.push(index);
    aggregate.total_calls += 1;
    aggregate.status_codes.insert(exchange.status);

    for param in &exchange.query_params {
        aggregate.parameters.record(&param.name, &param.value);
    }
    for header in &exchange.request_headers {
        aggregate
            .request_headers
            .record(&header.name.to_ascii_lowercase(), &header.value);
    }
    for header in &exchange.response_headers {
        aggregate
            .response_headers
            .record(&header.name.to_ascii_lowercase(), &header.value);
    }

    // Bodies that are not JSON still count as calls; they just add no schema
    if let Some(text) = exchange.request_body.as_ref().and_then(|b| b.text.as_deref()) {
        if let Some(schema) = builder.build_from_text(text) {
            merge_into(&mut aggregate.request_schema, schema);
        }
    }
    if exchange.has_json_response() {
        if let Some(text) = exchange.response_body.text.as_deref() {
            if let Some(schema) = builder.build_from_text(text) {
                merge_into(&mut aggregate.response_schema, schema);
            }
        }
    }
}

fn average_time(exchanges: &[CapturedExchange], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let total: f64 = indices.iter().map(|&i| exchanges[i].time).sum();
    total / indices.len() as f64
}
