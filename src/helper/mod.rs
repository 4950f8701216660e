pub mod admin_helpers;
pub mod export_helpers;
pub mod form_helpers;
pub mod kayit_helpers;
pub mod notification_helpers;
pub mod public_helpers;
pub mod qr_helpers;
