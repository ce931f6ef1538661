//! Read handlers — executed immediately, no confirmation step.

use chrono::Utc;
use crewcall_domain::document::query::Direction;
use crewcall_domain::{
    DispatchError, DispatchOutcome, FieldFilter, FilterOp, OrderBy, ToolCall,
    sanitize_for_display,
};
use serde_json::{Value, json};

use crate::ports::document_store::DocumentStorePort;
use crate::use_cases::analytics::AnalyticsWindow;
use crate::use_cases::query_engine::{DateRange, QueryParams};
use crate::use_cases::recommend_staff::RecommendStaffInput;

use super::ToolDispatcher;

fn eq_filter(field: &str, value: &str) -> FieldFilter {
    FieldFilter {
        field: field.to_string(),
        op: FilterOp::Eq,
        value: json!(value),
    }
}

fn contains_filter(field: &str, value: &str) -> FieldFilter {
    FieldFilter {
        field: field.to_string(),
        op: FilterOp::Contains,
        value: json!(value),
    }
}

fn rows_outcome(rows: Vec<Value>, rendered: bool) -> DispatchOutcome {
    if rendered {
        let items = Value::Array(rows);
        DispatchOutcome::rendered("booking_list", items.clone(), items)
    } else {
        DispatchOutcome::Data(Value::Array(rows))
    }
}

impl ToolDispatcher {
    pub(super) async fn op_get_bookings(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut params = QueryParams {
            limit: call.get_u64("limit").map(|n| n as usize),
            ..Default::default()
        };
        if let Some(status) = call.get_non_empty("status") {
            params = params.with_filter(eq_filter("status", status));
        }
        if let Some(client) = call.get_non_empty("clientName") {
            params = params.with_filter(contains_filter("clientName", client));
        }
        if let Some(show) = call.get_non_empty("showName") {
            params = params.with_filter(contains_filter("showName", show));
        }
        let (rows, rendered) = self.query.query_collection("bookings", params).await?;
        Ok(rows_outcome(rows, rendered))
    }

    pub(super) async fn op_get_staff(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut params = QueryParams {
            limit: call.get_u64("limit").map(|n| n as usize),
            ..Default::default()
        };
        if let Some(role) = call.get_non_empty("role") {
            params = params.with_filter(eq_filter("role", role));
        }
        if let Some(skill) = call.get_non_empty("skill") {
            params = params.with_filter(FieldFilter {
                field: "skills".to_string(),
                op: FilterOp::ArrayContains,
                value: json!(skill),
            });
        }
        let (rows, _) = self.query.query_collection("staff", params).await?;
        Ok(rows_outcome(rows, false))
    }

    pub(super) async fn op_get_clients(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut params = QueryParams {
            limit: call.get_u64("limit").map(|n| n as usize),
            ..Default::default()
        };
        if let Some(company) = call.get_non_empty("company") {
            params = params.with_filter(contains_filter("company", company));
        }
        let (rows, _) = self.query.query_collection("clients", params).await?;
        Ok(rows_outcome(rows, false))
    }

    pub(super) async fn op_get_shows(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut params = QueryParams {
            limit: call.get_u64("limit").map(|n| n as usize),
            ..Default::default()
        };
        if let Some(status) = call.get_non_empty("status") {
            params = params.with_filter(eq_filter("status", status));
        }
        if let Some(venue) = call.get_non_empty("venue") {
            params = params.with_filter(contains_filter("venue", venue));
        }
        if call.get_bool("upcoming").unwrap_or(false) {
            params.date_range = Some(DateRange {
                field: "startDate".to_string(),
                start: Some(Utc::now().format("%Y-%m-%d").to_string()),
                end: None,
            });
        }
        let (rows, _) = self.query.query_collection("shows", params).await?;
        Ok(rows_outcome(rows, false))
    }

    pub(super) async fn op_get_availability(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut params = QueryParams {
            expand: true,
            limit: call.get_u64("limit").map(|n| n as usize),
            ..Default::default()
        };
        if let Some(staff_id) = call.get_non_empty("staffId") {
            params = params.with_filter(eq_filter("staffId", staff_id));
        }
        if let Some(show_id) = call.get_non_empty("showId") {
            params = params.with_filter(eq_filter("showId", show_id));
        }
        let (rows, _) = self.query.query_collection("availability", params).await?;
        Ok(rows_outcome(rows, false))
    }

    pub(super) async fn op_query_collection(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let collection = call.require_string("collection").map_err(DispatchError::Validation)?;
        let params = parse_query_params(call)?;
        let (rows, rendered) = self.query.query_collection(collection, params).await?;
        Ok(rows_outcome(rows, rendered))
    }

    pub(super) async fn op_search_records(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let collection = call.require_string("collection").map_err(DispatchError::Validation)?;
        let field = call.require_string("field").map_err(DispatchError::Validation)?;
        let term = call.require_string("term").map_err(DispatchError::Validation)?;
        let rows = self.store.search(collection, field, term).await?;
        Ok(DispatchOutcome::Data(Value::Array(
            rows.iter().map(sanitize_for_display).collect(),
        )))
    }

    pub(super) async fn op_list_names(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let collection = call.require_string("collection").map_err(DispatchError::Validation)?;
        let names = self.query.list_names(collection).await?;
        Ok(DispatchOutcome::Data(Value::Array(names)))
    }

    pub(super) async fn op_get_analytics(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let window = AnalyticsWindow {
            start_date: call.get_non_empty("startDate").map(str::to_string),
            end_date: call.get_non_empty("endDate").map(str::to_string),
            limit: call.get_u64("limit").map(|n| n as usize),
        };
        let report = self.analytics.execute(window).await?;
        Ok(DispatchOutcome::Data(report))
    }

    pub(super) async fn op_recommend_staff(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let input = RecommendStaffInput {
            show: call.get_non_empty("showName").map(str::to_string),
            date: call.get_non_empty("date").map(str::to_string),
            dates: call.get_string_array("dates"),
            start_date: call.get_non_empty("startDate").map(str::to_string),
            end_date: call.get_non_empty("endDate").map(str::to_string),
            role: call.get_non_empty("role").map(str::to_string),
            skills: call.get_string_array("skills"),
            limit: call.get_u64("limit").map(|n| n as usize),
        };
        let ranked = self.recommend.execute(input).await?;
        Ok(DispatchOutcome::Data(ranked))
    }

    pub(super) async fn op_count_shows_worked(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let name = call.require_string("name").map_err(DispatchError::Validation)?;
        let report = self.query.count_shows_worked_by_staff(name).await?;
        Ok(DispatchOutcome::Data(report))
    }

    pub(super) async fn op_clients_for_staff(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let name = call.require_string("name").map_err(DispatchError::Validation)?;
        let report = self.query.clients_for_staff_shows(name).await?;
        Ok(DispatchOutcome::Data(report))
    }
}

/// Deserialize the wire-shape query arguments into [`QueryParams`].
fn parse_query_params(call: &ToolCall) -> Result<QueryParams, DispatchError> {
    let filters = match call.get_array("filters") {
        Some(items) => serde_json::from_value(Value::Array(items.clone()))
            .map_err(|e| DispatchError::Validation(format!("bad filters: {e}")))?,
        None => Vec::new(),
    };

    let date_range = match call.get_object("dateRange") {
        Some(range) => {
            let field = range
                .get("field")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    DispatchError::Validation("dateRange requires a field".to_string())
                })?
                .to_string();
            Some(DateRange {
                field,
                start: range.get("start").and_then(Value::as_str).map(str::to_string),
                end: range.get("end").and_then(Value::as_str).map(str::to_string),
            })
        }
        None => None,
    };

    let order_by = call.get_object("orderBy").and_then(|order| {
        let field = order.get("field").and_then(Value::as_str)?;
        let direction = order
            .get("direction")
            .and_then(Value::as_str)
            .map(Direction::parse)
            .unwrap_or_default();
        Some(OrderBy {
            field: field.to_string(),
            direction,
        })
    });

    Ok(QueryParams {
        filters,
        date_range,
        select: call.get_string_array("select"),
        order_by,
        expand: call.get_bool("expand").unwrap_or(false),
        limit: call.get_u64("limit").map(|n| n as usize),
    })
}
