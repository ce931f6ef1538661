//! Catalog definitions for every dispatchable operation.
//!
//! Descriptions and parameter schemas are the only information the
//! language model receives about what it may request. Changing a parameter
//! name here without updating the handler's argument reads breaks the
//! integration silently — keep them in lockstep.

use crewcall_domain::{ParamType, ToolCatalog, ToolDefinition, ToolParameter};

use super::Operation;

/// Build the full catalog from [`Operation::ALL`].
pub fn build_catalog() -> ToolCatalog {
    Operation::ALL
        .iter()
        .fold(ToolCatalog::new(), |catalog, op| catalog.register(definition(*op)))
}

fn definition(op: Operation) -> ToolDefinition {
    let tool = ToolDefinition::new(op.name(), description(op), op.risk());
    parameters(op)
        .into_iter()
        .fold(tool, ToolDefinition::with_parameter)
}

fn description(op: Operation) -> &'static str {
    match op {
        Operation::GetBookings => {
            "List bookings, optionally filtered by status or client/show name. Results include resolved client, show and staff names."
        }
        Operation::GetStaff => "List staff members, optionally filtered by role or skill.",
        Operation::GetClients => "List clients, optionally filtered by company name.",
        Operation::GetShows => {
            "List shows, optionally filtered by status or venue, or restricted to upcoming shows."
        }
        Operation::GetAvailability => {
            "List availability records, optionally filtered by staff or show id."
        }
        Operation::QueryCollection => {
            "Generic query over any collection with filters, a date range, projection, sorting and a limit."
        }
        Operation::SearchRecords => {
            "Case-insensitive substring search on one field of a collection."
        }
        Operation::ListNames => "List the id and display name of every record in a collection.",
        Operation::GetAnalytics => {
            "Aggregate report: totals, booking-status histogram, top clients, top staff by days worked, role histogram, upcoming shows."
        }
        Operation::RecommendStaff => {
            "Rank staff for a show or date range by availability coverage, role and skills."
        }
        Operation::CountShowsWorkedByStaff => {
            "Count the distinct shows a staff member has been booked on."
        }
        Operation::ClientsForStaffShows => {
            "List the distinct clients behind the shows a staff member worked."
        }
        Operation::UpdateStaff => "Update a staff member by exact id. Applied immediately.",
        Operation::UpdateClient => "Update a client by exact id. Applied immediately.",
        Operation::UpdateShow => "Update a show by exact id. Applied immediately.",
        Operation::BatchCreate => {
            "Create several full records at once. Applied immediately, all-or-nothing."
        }
        Operation::CreateBooking => {
            "Propose a new booking for a client and show. Returns a confirmation envelope."
        }
        Operation::CreateStaff => {
            "Propose a new staff member. Returns a confirmation envelope."
        }
        Operation::CreateClient => "Propose a new client. Returns a confirmation envelope.",
        Operation::CreateShow => "Propose a new show. Returns a confirmation envelope.",
        Operation::UpdateBooking => {
            "Propose changes to a booking by id, optionally patching one datesNeeded row."
        }
        Operation::UpdateBookingByNames => {
            "Propose changes to a booking identified by client and show name, optionally patching one datesNeeded row."
        }
        Operation::UpdateStaffByName => {
            "Propose changes to a staff member by name. Fields are allow-listed and diffed against the current record."
        }
        Operation::UpdateClientByName => {
            "Propose changes to a client by name, diffed against the current record."
        }
        Operation::UpdateMentionedStaff => {
            "Propose changes to the staff member referenced by a chat mention."
        }
        Operation::UpdateMentionedShow => {
            "Propose changes to the show referenced by a chat mention."
        }
        Operation::UpdateRecord => {
            "Propose changes to any record by collection and id, diffed against the current record."
        }
        Operation::UpdateRecordByName => {
            "Propose changes to any record by collection and name, diffed against the current record."
        }
    }
}

fn parameters(op: Operation) -> Vec<ToolParameter> {
    let limit = || {
        ToolParameter::new("limit", "Maximum number of results", false)
            .with_type(ParamType::Number)
    };
    let updates = || {
        ToolParameter::new("updates", "Fields to change", true).with_type(ParamType::Object)
    };
    let collection = || {
        ToolParameter::new(
            "collection",
            "One of: bookings, staff, clients, shows, availability",
            true,
        )
    };

    match op {
        Operation::GetBookings => vec![
            ToolParameter::new("status", "Filter by booking status", false),
            ToolParameter::new("clientName", "Filter by client name (substring)", false),
            ToolParameter::new("showName", "Filter by show name (substring)", false),
            limit(),
        ],
        Operation::GetStaff => vec![
            ToolParameter::new("role", "Filter by exact role", false),
            ToolParameter::new("skill", "Filter by a skill the staff member has", false),
            limit(),
        ],
        Operation::GetClients => vec![
            ToolParameter::new("company", "Filter by company name (substring)", false),
            limit(),
        ],
        Operation::GetShows => vec![
            ToolParameter::new("status", "Filter by show status", false),
            ToolParameter::new("venue", "Filter by venue (substring)", false),
            ToolParameter::new("upcoming", "Only shows starting today or later", false)
                .with_type(ParamType::Boolean),
            limit(),
        ],
        Operation::GetAvailability => vec![
            ToolParameter::new("staffId", "Filter by staff id", false),
            ToolParameter::new("showId", "Filter by show id", false),
            limit(),
        ],
        Operation::QueryCollection => vec![
            collection(),
            ToolParameter::new(
                "filters",
                "Filter objects {field, operator, value}; operators: ==, !=, >, <, >=, <=, contains, in, array_contains",
                false,
            )
            .with_items(ParamType::Object),
            ToolParameter::new(
                "dateRange",
                "Inclusive range {field, start?, end?} compared as ISO date strings",
                false,
            )
            .with_type(ParamType::Object),
            ToolParameter::new("select", "Field names to keep in each row", false)
                .with_items(ParamType::String),
            ToolParameter::new("orderBy", "Sort clause {field, direction: asc|desc}", false)
                .with_type(ParamType::Object),
            ToolParameter::new("expand", "Resolve referenced names", false)
                .with_type(ParamType::Boolean),
            limit(),
        ],
        Operation::SearchRecords => vec![
            collection(),
            ToolParameter::new("field", "Field to search", true),
            ToolParameter::new("term", "Substring to search for", true),
        ],
        Operation::ListNames => vec![collection()],
        Operation::GetAnalytics => vec![
            ToolParameter::new("startDate", "Window start (inclusive, YYYY-MM-DD)", false),
            ToolParameter::new("endDate", "Window end (inclusive, YYYY-MM-DD)", false),
            limit(),
        ],
        Operation::RecommendStaff => vec![
            ToolParameter::new("showName", "Show name or id", false),
            ToolParameter::new("date", "Single target date (YYYY-MM-DD)", false),
            ToolParameter::new("dates", "Explicit target dates", false)
                .with_items(ParamType::String),
            ToolParameter::new("startDate", "Range start (inclusive)", false),
            ToolParameter::new("endDate", "Range end (inclusive)", false),
            ToolParameter::new("role", "Preferred role (case-insensitive)", false),
            ToolParameter::new("skills", "Requested skills", false)
                .with_items(ParamType::String),
            limit(),
        ],
        Operation::CountShowsWorkedByStaff | Operation::ClientsForStaffShows => {
            vec![ToolParameter::new("name", "Staff member name", true)]
        }
        Operation::UpdateStaff | Operation::UpdateClient | Operation::UpdateShow => vec![
            ToolParameter::new("id", "Exact record id", true),
            updates(),
        ],
        Operation::BatchCreate => vec![
            ToolParameter::new(
                "records",
                "Records to create, each {collection, data}",
                true,
            )
            .with_items(ParamType::Object),
        ],
        Operation::CreateBooking => vec![
            ToolParameter::new("clientName", "Client name", true),
            ToolParameter::new("showName", "Show name", true),
            ToolParameter::new("assignedDate", "Single date needing staff (YYYY-MM-DD)", false),
            ToolParameter::new("staffCount", "Head count for assignedDate", false)
                .with_type(ParamType::Number),
            ToolParameter::new(
                "datesNeeded",
                "Explicit rows {date, staffCount, staffIds, role?, shift?}",
                false,
            )
            .with_items(ParamType::Object),
            ToolParameter::new("status", "Initial status (defaults to pending)", false),
            ToolParameter::new("notes", "Free-form notes", false),
        ],
        Operation::CreateStaff => vec![
            ToolParameter::new("name", "Full name", true),
            ToolParameter::new("email", "Email address", false),
            ToolParameter::new("phone", "Phone number", false),
            ToolParameter::new("role", "Role", false),
            ToolParameter::new("skills", "Skills", false).with_items(ParamType::String),
            ToolParameter::new("payRate", "Hourly pay rate", false).with_type(ParamType::Number),
            ToolParameter::new("notes", "Free-form notes", false),
        ],
        Operation::CreateClient => vec![
            ToolParameter::new("name", "Contact name", false),
            ToolParameter::new("company", "Company name", false),
            ToolParameter::new("email", "Email address", false),
            ToolParameter::new("phone", "Phone number", false),
            ToolParameter::new("notes", "Free-form notes", false),
        ],
        Operation::CreateShow => vec![
            ToolParameter::new("name", "Show name", true),
            ToolParameter::new("startDate", "First day (YYYY-MM-DD)", false),
            ToolParameter::new("endDate", "Last day (YYYY-MM-DD)", false),
            ToolParameter::new("venue", "Venue", false),
            ToolParameter::new("status", "Show status", false),
        ],
        Operation::UpdateBooking => vec![
            ToolParameter::new("id", "Exact booking id", true),
            updates(),
            ToolParameter::new("date", "datesNeeded row to patch (YYYY-MM-DD)", false),
        ],
        Operation::UpdateBookingByNames => vec![
            ToolParameter::new("clientName", "Client name on the booking", true),
            ToolParameter::new("showName", "Show name on the booking", true),
            updates(),
            ToolParameter::new("date", "datesNeeded row to patch (YYYY-MM-DD)", false),
        ],
        Operation::UpdateStaffByName | Operation::UpdateClientByName => vec![
            ToolParameter::new("name", "Record name", true),
            updates(),
        ],
        Operation::UpdateMentionedStaff | Operation::UpdateMentionedShow => vec![
            ToolParameter::new("mention", "Chat mention text, e.g. @JonS", true),
            updates(),
        ],
        Operation::UpdateRecord => vec![
            collection(),
            ToolParameter::new("id", "Exact record id", true),
            updates(),
        ],
        Operation::UpdateRecordByName => vec![
            collection(),
            ToolParameter::new("name", "Record name", true),
            updates(),
        ],
    }
}
