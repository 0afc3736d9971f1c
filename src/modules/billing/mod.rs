// Billing module: recurring plans and agreements

pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use models::{CreateAgreementRequest, PlanSelector};
pub use services::BillingService;
