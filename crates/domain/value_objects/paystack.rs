use serde::Deserialize;

pub const CHARGE_SUCCESS_EVENT: &str = "charge.success";
pub const CHARGE_SUCCESS_STATUS: &str = "success";

/// Paystack event envelope. `data` stays opaque until the event type is known.
#[derive(Debug, Clone, Deserialize)]
pub struct PaystackEvent {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaystackCustomer {
    pub email: String,
}

/// Fields read from a `charge.success` event's `data` object.
#[derive(Debug, Clone, Deserialize)]
pub struct PaystackChargeData {
    pub status: String,
    pub reference: String,
    #[serde(default)]
    pub amount: Option<i64>,
    pub customer: PaystackCustomer,
}

impl PaystackEvent {
    pub fn charge_data(&self) -> serde_json::Result<PaystackChargeData> {
        PaystackChargeData::deserialize(&self.data)
    }
}
