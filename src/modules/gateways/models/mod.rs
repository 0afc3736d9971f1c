pub mod billing;
pub mod payment;

pub use billing::{
    Agreement, AgreementDraft, AgreementTransaction, AgreementTransactions, CreatedAgreement,
    DefinitionType, Frequency, MerchantPreferences, PaymentDefinition, Plan, PlanList,
    PlanRequest, PlanState, PlanType,
};
pub use payment::{
    find_link, CreatedIntent, Link, Payer, PayerInfo, PaymentDetails, PaymentHistory,
    PaymentIntentRequest,
};
