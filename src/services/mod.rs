pub mod clients;
pub mod company_profiles;
pub mod invoices;
pub mod products;
pub mod smtp_accounts;
