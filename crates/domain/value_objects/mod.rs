pub mod enums;
pub mod paystack;
pub mod plans;
pub mod profiles;
pub mod voice_notes;
