//! Payment methods accepted for subscription payments.

use serde::{Deserialize, Serialize};

/// How a provider claims to have paid.
///
/// All methods are declared, not captured: no payment gateway is
/// involved, an administrator checks the money arrived out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant account-to-account transfer, identified by an external
    /// transaction reference.
    InstantTransfer,

    /// Ordinary bank transfer, usually with a remittance reference.
    BankTransfer,

    /// Cash handed over in person.
    Cash,

    /// Paper cheque.
    Cheque,
}

impl PaymentMethod {
    /// Methods that normally carry an external transaction reference.
    pub fn expects_reference(&self) -> bool {
        matches!(
            self,
            PaymentMethod::InstantTransfer | PaymentMethod::BankTransfer
        )
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentMethod::InstantTransfer => "instant_transfer",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Cheque => "cheque",
        };
        write!(f, "{}", name)
    }
}
