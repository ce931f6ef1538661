//! Tool dispatch.
//!
//! [`Operation`] is the closed set of operations the language model may
//! request. The catalog and the dispatcher routing are both generated from
//! [`Operation::ALL`], so their key sets cannot drift; a test asserts the
//! equality anyway.
//!
//! Reads execute immediately. Direct-id writes execute immediately. Every
//! name-resolved or creation write returns a pending envelope instead of
//! touching the store — see [`writes`].

mod catalog;
mod reads;
mod writes;

pub use catalog::build_catalog;

use std::sync::Arc;

use crewcall_domain::{
    DefaultToolValidator, DispatchError, DispatchOutcome, RiskLevel, ToolCall, ToolCatalog,
    ToolValidator,
};
use tracing::debug;

use crate::ports::document_store::DocumentStorePort;
use crate::use_cases::analytics::AnalyticsUseCase;
use crate::use_cases::query_engine::QueryEngine;
use crate::use_cases::recommend_staff::RecommendStaffUseCase;

/// The closed set of dispatchable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Reads
    GetBookings,
    GetStaff,
    GetClients,
    GetShows,
    GetAvailability,
    QueryCollection,
    SearchRecords,
    ListNames,
    GetAnalytics,
    RecommendStaff,
    CountShowsWorkedByStaff,
    ClientsForStaffShows,
    // Direct-id / full-record writes (applied immediately)
    UpdateStaff,
    UpdateClient,
    UpdateShow,
    BatchCreate,
    // Name-resolved / creation writes (always return an envelope)
    CreateBooking,
    CreateStaff,
    CreateClient,
    CreateShow,
    UpdateBooking,
    UpdateBookingByNames,
    UpdateStaffByName,
    UpdateClientByName,
    UpdateMentionedStaff,
    UpdateMentionedShow,
    UpdateRecord,
    UpdateRecordByName,
}

impl Operation {
    pub const ALL: [Operation; 28] = [
        Operation::GetBookings,
        Operation::GetStaff,
        Operation::GetClients,
        Operation::GetShows,
        Operation::GetAvailability,
        Operation::QueryCollection,
        Operation::SearchRecords,
        Operation::ListNames,
        Operation::GetAnalytics,
        Operation::RecommendStaff,
        Operation::CountShowsWorkedByStaff,
        Operation::ClientsForStaffShows,
        Operation::UpdateStaff,
        Operation::UpdateClient,
        Operation::UpdateShow,
        Operation::BatchCreate,
        Operation::CreateBooking,
        Operation::CreateStaff,
        Operation::CreateClient,
        Operation::CreateShow,
        Operation::UpdateBooking,
        Operation::UpdateBookingByNames,
        Operation::UpdateStaffByName,
        Operation::UpdateClientByName,
        Operation::UpdateMentionedStaff,
        Operation::UpdateMentionedShow,
        Operation::UpdateRecord,
        Operation::UpdateRecordByName,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetBookings => "get_bookings",
            Operation::GetStaff => "get_staff",
            Operation::GetClients => "get_clients",
            Operation::GetShows => "get_shows",
            Operation::GetAvailability => "get_availability",
            Operation::QueryCollection => "query_collection",
            Operation::SearchRecords => "search_records",
            Operation::ListNames => "list_names",
            Operation::GetAnalytics => "get_analytics",
            Operation::RecommendStaff => "recommend_staff",
            Operation::CountShowsWorkedByStaff => "count_shows_worked_by_staff",
            Operation::ClientsForStaffShows => "clients_for_staff_shows",
            Operation::UpdateStaff => "update_staff",
            Operation::UpdateClient => "update_client",
            Operation::UpdateShow => "update_show",
            Operation::BatchCreate => "batch_create",
            Operation::CreateBooking => "create_booking",
            Operation::CreateStaff => "create_staff",
            Operation::CreateClient => "create_client",
            Operation::CreateShow => "create_show",
            Operation::UpdateBooking => "update_booking",
            Operation::UpdateBookingByNames => "update_booking_by_names",
            Operation::UpdateStaffByName => "update_staff_by_name",
            Operation::UpdateClientByName => "update_client_by_name",
            Operation::UpdateMentionedStaff => "update_mentioned_staff",
            Operation::UpdateMentionedShow => "update_mentioned_show",
            Operation::UpdateRecord => "update_record",
            Operation::UpdateRecordByName => "update_record_by_name",
        }
    }

    pub fn parse(name: &str) -> Option<Operation> {
        Operation::ALL.iter().copied().find(|op| op.name() == name)
    }

    pub fn risk(&self) -> RiskLevel {
        match self {
            Operation::GetBookings
            | Operation::GetStaff
            | Operation::GetClients
            | Operation::GetShows
            | Operation::GetAvailability
            | Operation::QueryCollection
            | Operation::SearchRecords
            | Operation::ListNames
            | Operation::GetAnalytics
            | Operation::RecommendStaff
            | Operation::CountShowsWorkedByStaff
            | Operation::ClientsForStaffShows => RiskLevel::Low,
            _ => RiskLevel::High,
        }
    }
}

/// Tunables threaded from configuration into dispatch.
#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    /// How many "did you mean" candidates a failed lookup carries.
    pub suggestion_limit: usize,
    /// Result count for `recommend_staff` when the call omits `limit`.
    pub recommend_limit: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: 3,
            recommend_limit: 5,
        }
    }
}

/// Routes validated tool calls to their handlers.
pub struct ToolDispatcher {
    store: Arc<dyn DocumentStorePort>,
    catalog: ToolCatalog,
    validator: DefaultToolValidator,
    config: DispatchConfig,
    query: QueryEngine,
    analytics: AnalyticsUseCase,
    recommend: RecommendStaffUseCase,
}

impl ToolDispatcher {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self::with_config(store, DispatchConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStorePort>, config: DispatchConfig) -> Self {
        Self {
            catalog: build_catalog(),
            validator: DefaultToolValidator,
            query: QueryEngine::with_config(store.clone(), config),
            analytics: AnalyticsUseCase::new(store.clone()),
            recommend: RecommendStaffUseCase::with_config(store.clone(), config),
            config,
            store,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Validate and execute a single tool call.
    pub async fn execute(&self, call: &ToolCall) -> Result<DispatchOutcome, DispatchError> {
        let definition = self
            .catalog
            .get(&call.tool_name)
            .ok_or_else(|| DispatchError::UnknownOperation(call.tool_name.clone()))?;
        self.validator
            .validate(call, definition)
            .map_err(DispatchError::Validation)?;
        let op = Operation::parse(&call.tool_name)
            .ok_or_else(|| DispatchError::UnknownOperation(call.tool_name.clone()))?;

        debug!(tool = %call.tool_name, risk = %op.risk(), "dispatching");

        match op {
            Operation::GetBookings => self.op_get_bookings(call).await,
            Operation::GetStaff => self.op_get_staff(call).await,
            Operation::GetClients => self.op_get_clients(call).await,
            Operation::GetShows => self.op_get_shows(call).await,
            Operation::GetAvailability => self.op_get_availability(call).await,
            Operation::QueryCollection => self.op_query_collection(call).await,
            Operation::SearchRecords => self.op_search_records(call).await,
            Operation::ListNames => self.op_list_names(call).await,
            Operation::GetAnalytics => self.op_get_analytics(call).await,
            Operation::RecommendStaff => self.op_recommend_staff(call).await,
            Operation::CountShowsWorkedByStaff => self.op_count_shows_worked(call).await,
            Operation::ClientsForStaffShows => self.op_clients_for_staff(call).await,
            Operation::UpdateStaff => self.op_direct_update("staff", call).await,
            Operation::UpdateClient => self.op_direct_update("clients", call).await,
            Operation::UpdateShow => self.op_direct_update("shows", call).await,
            Operation::BatchCreate => self.op_batch_create(call).await,
            Operation::CreateBooking => self.op_create_booking(call).await,
            Operation::CreateStaff => self.op_create_staff(call).await,
            Operation::CreateClient => self.op_create_client(call).await,
            Operation::CreateShow => self.op_create_show(call).await,
            Operation::UpdateBooking => self.op_update_booking(call).await,
            Operation::UpdateBookingByNames => self.op_update_booking_by_names(call).await,
            Operation::UpdateStaffByName => self.op_update_staff_by_name(call).await,
            Operation::UpdateClientByName => self.op_update_client_by_name(call).await,
            Operation::UpdateMentionedStaff => self.op_update_mentioned_staff(call).await,
            Operation::UpdateMentionedShow => self.op_update_mentioned_show(call).await,
            Operation::UpdateRecord => self.op_update_record(call).await,
            Operation::UpdateRecordByName => self.op_update_record_by_name(call).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::InMemoryStore;
    use std::collections::BTreeSet;

    #[test]
    fn test_catalog_and_dispatcher_key_sets_match() {
        let catalog = build_catalog();
        let catalog_names: BTreeSet<&str> = catalog.names().collect();
        let operation_names: BTreeSet<&str> =
            Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(catalog_names, operation_names);
        assert_eq!(catalog.len(), Operation::ALL.len());
    }

    #[test]
    fn test_catalog_risk_levels_follow_operations() {
        let catalog = build_catalog();
        for op in Operation::ALL {
            let definition = catalog.get(op.name()).unwrap();
            assert_eq!(definition.risk_level, op.risk(), "{}", op.name());
        }
    }

    #[test]
    fn test_operation_parse_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::parse(op.name()), Some(op));
        }
        assert_eq!(Operation::parse("frob_widgets"), None);
    }

    #[tokio::test]
    async fn test_unknown_operation_rejected() {
        let dispatcher = ToolDispatcher::new(Arc::new(InMemoryStore::new()));
        let err = dispatcher
            .execute(&ToolCall::new("frob_widgets"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownOperation(_)));
    }

    #[tokio::test]
    async fn test_configured_recommend_limit_caps_results() {
        use serde_json::json;
        let store = Arc::new(
            InMemoryStore::new()
                .seed(
                    "staff",
                    vec![
                        json!({"id": "s1", "name": "Jon Smith"}),
                        json!({"id": "s2", "name": "Jane Roe"}),
                    ],
                )
                .seed(
                    "availability",
                    vec![
                        json!({"id": "a1", "staffId": "s1", "availableDates": ["2025-03-01"]}),
                        json!({"id": "a2", "staffId": "s2", "availableDates": ["2025-03-01"]}),
                    ],
                ),
        );
        let dispatcher = ToolDispatcher::with_config(
            store,
            DispatchConfig {
                recommend_limit: 1,
                ..Default::default()
            },
        );
        // No explicit limit on the call: the configured default applies.
        let call = ToolCall::new("recommend_staff").with_arg("date", json!("2025-03-01"));
        let outcome = dispatcher.execute(&call).await.unwrap();
        let DispatchOutcome::Data(rows) = outcome else {
            panic!("expected plain data");
        };
        assert_eq!(rows.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validation_runs_before_handlers() {
        let dispatcher = ToolDispatcher::new(Arc::new(InMemoryStore::new()));
        // update_staff requires id and updates
        let err = dispatcher
            .execute(&ToolCall::new("update_staff"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
    }
}
