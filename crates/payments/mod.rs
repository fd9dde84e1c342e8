pub mod paystack_webhook;
