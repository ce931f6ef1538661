//! Collection-aware read pipeline.
//!
//! `query_collection` is the generic read behind most catalog operations:
//! load the full collection, normalize timestamps, filter, date-range,
//! enrich with denormalized names, sort, project, and apply the limit
//! strictly last. Booking results are always enriched and returned as a
//! `booking_list` rendering pair.

use std::collections::HashMap;
use std::sync::Arc;

use crewcall_domain::document::fields::{doc_id, field_array, non_empty_str};
use crewcall_domain::document::query::{matches_all, project, sort_docs};
use crewcall_domain::staffing::booking::booking_staff_ids;
use crewcall_domain::{
    DispatchError, FieldFilter, OrderBy, client_display, display_name, sanitize_for_display,
    show_display,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::ports::document_store::DocumentStorePort;
use crate::use_cases::dispatch::DispatchConfig;
use crate::use_cases::resolve::resolve_named;

/// Inclusive string-date range on a named field.
#[derive(Debug, Clone)]
pub struct DateRange {
    pub field: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    fn contains(&self, doc: &Value) -> bool {
        let Some(value) = doc.get(&self.field).and_then(Value::as_str) else {
            return false;
        };
        if self.start.as_deref().is_some_and(|s| value < s) {
            return false;
        }
        if self.end.as_deref().is_some_and(|e| value > e) {
            return false;
        }
        true
    }
}

/// Parameters of a generic collection query.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub filters: Vec<FieldFilter>,
    pub date_range: Option<DateRange>,
    pub select: Vec<String>,
    pub order_by: Option<OrderBy>,
    pub expand: bool,
    pub limit: Option<usize>,
}

impl QueryParams {
    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Read-side use cases over the document store.
pub struct QueryEngine {
    store: Arc<dyn DocumentStorePort>,
    suggestion_limit: usize,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self::with_config(store, DispatchConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStorePort>, config: DispatchConfig) -> Self {
        Self {
            store,
            suggestion_limit: config.suggestion_limit,
        }
    }

    /// Run the generic query pipeline. Returns the sanitized rows, plus a
    /// `booking_list` rendering flag when the collection is `bookings`.
    pub async fn query_collection(
        &self,
        collection: &str,
        params: QueryParams,
    ) -> Result<(Vec<Value>, bool), DispatchError> {
        let docs = self.store.get_all(collection, true).await?;
        let mut docs: Vec<Value> = docs.iter().map(sanitize_for_display).collect();

        docs.retain(|d| matches_all(d, &params.filters));
        if let Some(range) = &params.date_range {
            docs.retain(|d| range.contains(d));
        }

        let is_bookings = collection == "bookings";
        if is_bookings {
            self.enrich_bookings(&mut docs).await?;
        } else if collection == "availability" && params.expand {
            self.expand_availability(&mut docs).await?;
        }

        if let Some(order) = &params.order_by {
            sort_docs(&mut docs, order);
        }
        if !params.select.is_empty() {
            docs = docs.iter().map(|d| project(d, &params.select)).collect();
        }
        // Limit is applied strictly last.
        if let Some(limit) = params.limit {
            docs.truncate(limit);
        }

        debug!(collection, rows = docs.len(), "query_collection");
        Ok((docs, is_bookings))
    }

    /// `{id, name}` pairs for every record in a collection.
    pub async fn list_names(&self, collection: &str) -> Result<Vec<Value>, DispatchError> {
        let docs = self.store.get_all(collection, true).await?;
        Ok(docs
            .iter()
            .map(|d| {
                json!({
                    "id": doc_id(d),
                    "name": display_name(d),
                })
            })
            .collect())
    }

    /// Distinct shows a staff member has been booked on.
    pub async fn count_shows_worked_by_staff(
        &self,
        staff_name: &str,
    ) -> Result<Value, DispatchError> {
        let (staff, shows) = self
            .staff_bookings_facet(staff_name, "shows", "showId", show_display)
            .await?;
        Ok(json!({
            "staffId": doc_id(&staff),
            "name": display_name(&staff),
            "showsWorked": shows.len(),
            "shows": shows,
        }))
    }

    /// Distinct clients behind the shows a staff member worked.
    pub async fn clients_for_staff_shows(
        &self,
        staff_name: &str,
    ) -> Result<Value, DispatchError> {
        let (staff, clients) = self
            .staff_bookings_facet(staff_name, "clients", "clientId", client_display)
            .await?;
        Ok(json!({
            "staffId": doc_id(&staff),
            "name": display_name(&staff),
            "clients": clients,
        }))
    }

    /// Resolve a staff member and collect one display facet from every
    /// booking that assigns them, deduplicated in order. Bookings that only
    /// carry an id for the facet fall back to the referenced collection.
    async fn staff_bookings_facet(
        &self,
        staff_name: &str,
        facet_collection: &str,
        id_field: &str,
        facet: fn(&Value) -> Option<String>,
    ) -> Result<(Value, Vec<String>), DispatchError> {
        let staff = resolve_named(
            self.store.as_ref(),
            "staff",
            "staff member",
            staff_name,
            self.suggestion_limit,
        )
        .await?;
        let staff_id = doc_id(&staff)
            .ok_or_else(|| DispatchError::Store("staff document missing id".to_string()))?
            .to_string();

        let (bookings, referenced) = tokio::try_join!(
            self.store.get_all("bookings", true),
            self.store.get_all(facet_collection, true),
        )?;
        let names = name_map(&referenced);

        let mut values = Vec::new();
        for booking in &bookings {
            if !booking_staff_ids(booking).contains(&staff_id) {
                continue;
            }
            let value = facet(booking).or_else(|| lookup(booking, id_field, &names));
            if let Some(value) = value {
                if !values.iter().any(|v: &String| v.eq_ignore_ascii_case(&value)) {
                    values.push(value);
                }
            }
        }
        Ok((staff, values))
    }

    /// Backfill `clientName`/`showName` and add per-row `staffNames` on
    /// bookings. Ids are never discarded — names stay advisory.
    async fn enrich_bookings(&self, docs: &mut [Value]) -> Result<(), DispatchError> {
        let (clients, shows, staff) = tokio::try_join!(
            self.store.get_all("clients", true),
            self.store.get_all("shows", true),
            self.store.get_all("staff", true),
        )?;
        let client_names = name_map(&clients);
        let show_names = name_map(&shows);
        let staff_names = name_map(&staff);

        for doc in docs.iter_mut() {
            if client_display(doc).is_none() {
                if let Some(name) = lookup(doc, "clientId", &client_names) {
                    doc["clientName"] = json!(name);
                }
            }
            if show_display(doc).is_none() {
                if let Some(name) = lookup(doc, "showId", &show_names) {
                    doc["showName"] = json!(name);
                }
            }
            let rows = field_array(doc, "datesNeeded").cloned().unwrap_or_default();
            if rows.is_empty() {
                continue;
            }
            let expanded: Vec<Value> = rows
                .into_iter()
                .map(|mut row| {
                    if !row.is_object() {
                        return row;
                    }
                    let names: Vec<String> = field_array(&row, "staffIds")
                        .map(|ids| {
                            ids.iter()
                                .filter_map(Value::as_str)
                                .filter(|id| !id.is_empty())
                                .map(|id| {
                                    staff_names.get(id).cloned().unwrap_or_else(|| id.to_string())
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    row["staffNames"] = json!(names);
                    row
                })
                .collect();
            doc["datesNeeded"] = Value::Array(expanded);
        }
        Ok(())
    }

    /// Backfill missing `staffName`/`showName` on availability records.
    async fn expand_availability(&self, docs: &mut [Value]) -> Result<(), DispatchError> {
        let (staff, shows) = tokio::try_join!(
            self.store.get_all("staff", true),
            self.store.get_all("shows", true),
        )?;
        let staff_names = name_map(&staff);
        let show_names = name_map(&shows);

        for doc in docs.iter_mut() {
            if non_empty_str(doc, "staffName").is_none() {
                if let Some(name) = lookup(doc, "staffId", &staff_names) {
                    doc["staffName"] = json!(name);
                }
            }
            if non_empty_str(doc, "showName").is_none() {
                if let Some(name) = lookup(doc, "showId", &show_names) {
                    doc["showName"] = json!(name);
                }
            }
        }
        Ok(())
    }
}

fn name_map(docs: &[Value]) -> HashMap<String, String> {
    docs.iter()
        .filter_map(|d| Some((doc_id(d)?.to_string(), display_name(d)?)))
        .collect()
}

fn lookup(doc: &Value, id_field: &str, names: &HashMap<String, String>) -> Option<String> {
    non_empty_str(doc, id_field).and_then(|id| names.get(id).cloned())
}
