//! Repository abstractions for data access.

pub mod campaign;
pub mod expense;
pub mod income;
pub mod invoice;
pub mod rbac;

pub use campaign::CampaignRepository;
pub use expense::ExpenseRepository;
pub use income::IncomeRepository;
pub use invoice::InvoiceRepository;
pub use rbac::RbacRepository;
