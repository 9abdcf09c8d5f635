mod braintree;

pub use braintree::{BraintreeGateway, PaymentGateway, PaymentReceipt};
