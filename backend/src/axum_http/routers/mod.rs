pub mod paystack_webhook;
pub mod plan_limits;
pub mod voice_notes;
