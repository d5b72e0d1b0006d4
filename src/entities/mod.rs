pub mod client;
pub mod company_profile;
pub mod invoice;
pub mod invoice_item;
pub mod product;
pub mod smtp_account;
