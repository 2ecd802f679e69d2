use axum::http::StatusCode;
use axum::routing::get;
use axum::Extension;
use axum::Router;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// Resource groups mounted under `/api/v1/<name>`. They have no storage yet;
/// each lists an empty collection scoped to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceGroup {
    Freelancers,
    Payments,
    Ratings,
}

impl ResourceGroup {
    pub const ALL: [ResourceGroup; 3] = [
        ResourceGroup::Freelancers,
        ResourceGroup::Payments,
        ResourceGroup::Ratings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceGroup::Freelancers => "freelancers",
            ResourceGroup::Payments => "payments",
            ResourceGroup::Ratings => "ratings",
        }
    }

    /// Router for this group; the caller nests it and applies the auth layer.
    pub fn router(self) -> Router<AppState> {
        Router::new().route(
            "/",
            get(move |Extension(current_user): Extension<CurrentUser>| async move {
                list_resources(self, current_user)
            }),
        )
    }
}

fn list_resources(
    group: ResourceGroup,
    CurrentUser(user): CurrentUser,
) -> ApiSuccess<ResourceListData> {
    tracing::debug!(resource = group.name(), user_id = %user.id, "Listing resources");

    ApiSuccess::new(
        StatusCode::OK,
        ResourceListData {
            resource: group.name(),
            owner_id: user.id.as_i64(),
            items: Vec::new(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceListData {
    pub resource: &'static str,
    pub owner_id: i64,
    pub items: Vec<serde_json::Value>,
}
