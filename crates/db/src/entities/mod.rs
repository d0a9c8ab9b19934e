//! `SeaORM` entity definitions.

pub mod campaigns;
pub mod expenses;
pub mod incomes;
pub mod invoices;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod user_roles;
pub mod users;
