//! Wire models for the integration API.

use serde::{Deserialize, Serialize};

use crate::mapping::FieldMappingRow;
use crate::platform::ContactFilter;
use crate::selector::ResourceOption;

pub const STATUS_SUCCESS: &str = "SUCCESS";
pub const STATUS_NOT_ADS_USER: &str = "NOT_ADS_USER";

/// Response to listing ad accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsResponse {
    pub status: String,
    #[serde(default)]
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
}

impl From<Customer> for ResourceOption {
    fn from(customer: Customer) -> Self {
        ResourceOption { id: customer.customer_id, name: customer.customer_name }
    }
}

/// Response to listing audience resources.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourcesResponse {
    pub status: String,
    #[serde(default)]
    pub user_lists: Vec<UserList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserList {
    pub id: String,
    pub list_name: String,
}

impl From<UserList> for ResourceOption {
    fn from(list: UserList) -> Self {
        ResourceOption { id: list.id, name: list.list_name }
    }
}

/// Body for creating a platform-side resource.
#[derive(Debug, Clone, Serialize)]
pub struct CreateResourceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// Response to creating a resource. Platforms disagree on the envelope
/// (`{channel: {list_id, ..}}` vs flat `{id, ..}`); both normalize to a
/// [`ResourceOption`] via [`into_option`](Self::into_option).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CreateResourceResponse {
    Wrapped { status: String, channel: CreatedChannel },
    Flat { id: String, list_name: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedChannel {
    pub list_id: String,
    pub list_name: String,
}

impl CreateResourceResponse {
    pub fn status(&self) -> &str {
        match self {
            Self::Wrapped { status, .. } => status,
            Self::Flat { .. } => STATUS_SUCCESS,
        }
    }

    pub fn into_option(self) -> ResourceOption {
        match self {
            Self::Wrapped { channel, .. } => ResourceOption {
                id: channel.list_id,
                name: channel.list_name,
            },
            Self::Flat { id, list_name } => ResourceOption { id, name: list_name },
        }
    }
}

/// Normalized sync job specification: the submission payload, and the shape a
/// persisted sync is seeded from in edit mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncJobSpec {
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_account_id: Option<String>,
    pub list_id: String,
    pub list_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_filter: Option<ContactFilter>,
    pub field_mappings: Vec<FieldMappingRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<i64>,
}
