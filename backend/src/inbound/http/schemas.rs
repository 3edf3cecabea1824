//! Response bodies shared by several endpoints.
//!
//! Domain types stay free of serde and utoipa. The wrappers here mirror them
//! for the wire and for the OpenAPI document.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{PricedLine, StoreDetail};

/// Error payload returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    #[schema(example = "ERR_017")]
    pub error_code: String,
    /// Client-facing message.
    #[schema(example = "NOT ENOUGH STOCK")]
    pub error_msg: String,
}

/// One priced item line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PricedLineResponse {
    pub item_id: Uuid,
    pub item_name: String,
    /// Unit price in minor currency units.
    pub price: u64,
    pub quantity: u32,
    /// `price × quantity`.
    pub subtotal: u64,
}

impl From<&PricedLine> for PricedLineResponse {
    fn from(line: &PricedLine) -> Self {
        Self {
            item_id: *line.item_id.as_uuid(),
            item_name: line.item_name.clone(),
            price: line.price,
            quantity: line.quantity,
            subtotal: line.subtotal,
        }
    }
}

/// Lines of one store with its delivery fee and store total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoreDetailResponse {
    pub store_id: Uuid,
    pub store_name: String,
    pub delivery_fee: u64,
    /// Delivery fee plus every line subtotal.
    pub store_total_price: u64,
    pub items: Vec<PricedLineResponse>,
}

impl From<&StoreDetail> for StoreDetailResponse {
    fn from(detail: &StoreDetail) -> Self {
        Self {
            store_id: *detail.store_id.as_uuid(),
            store_name: detail.store_name.clone(),
            delivery_fee: detail.delivery_fee,
            store_total_price: detail.store_total_price,
            items: detail.items.iter().map(PricedLineResponse::from).collect(),
        }
    }
}

pub(crate) fn store_details(details: &[StoreDetail]) -> Vec<StoreDetailResponse> {
    details.iter().map(StoreDetailResponse::from).collect()
}
