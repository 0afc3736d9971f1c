pub mod requests;

pub use requests::{
    AgreementNote, CreateAgreementRequest, ExecuteAgreementRequest, ListPlansQuery,
    PlanSelector, TransactionsQuery,
};
