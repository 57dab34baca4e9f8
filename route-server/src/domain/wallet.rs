//! Rider payment balances.

/// Error returned when a balance is negative or NaN.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {instrument} balance: {value}")]
pub struct InvalidBalance {
    instrument: &'static str,
    value: f64,
}

/// The rider's balances on each payment instrument.
///
/// Taxi legs are paid from cash and credit card combined; bus, tram and
/// transfer legs are paid from the farecard (kentkart). The two pools are
/// never mixed.
///
/// # Missing instruments
///
/// A wallet that is supplied treats every instrument it does not mention as
/// holding zero ([`PaymentWallet::from_partial`]). A request that carries
/// no wallet at all plans with [`PaymentWallet::unlimited`], which is also
/// the `Default`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentWallet {
    cash: f64,
    credit_card: f64,
    farecard: f64,
}

impl PaymentWallet {
    /// Create a wallet with explicit balances.
    pub fn new(cash: f64, credit_card: f64, farecard: f64) -> Result<Self, InvalidBalance> {
        Ok(Self {
            cash: check("cash", cash)?,
            credit_card: check("creditCard", credit_card)?,
            farecard: check("kentkart", farecard)?,
        })
    }

    /// Create a wallet from optionally-present balances; absent ones are zero.
    pub fn from_partial(
        cash: Option<f64>,
        credit_card: Option<f64>,
        farecard: Option<f64>,
    ) -> Result<Self, InvalidBalance> {
        Self::new(
            cash.unwrap_or(0.0),
            credit_card.unwrap_or(0.0),
            farecard.unwrap_or(0.0),
        )
    }

    /// A wallet that can pay for anything.
    pub fn unlimited() -> Self {
        Self {
            cash: f64::INFINITY,
            credit_card: f64::INFINITY,
            farecard: f64::INFINITY,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn credit_card(&self) -> f64 {
        self.credit_card
    }

    /// Balance usable for bus, tram and transfer legs.
    pub fn farecard(&self) -> f64 {
        self.farecard
    }

    /// Balance usable for taxi legs (cash plus credit card).
    pub fn taxi_funds(&self) -> f64 {
        self.cash + self.credit_card
    }
}

impl Default for PaymentWallet {
    fn default() -> Self {
        Self::unlimited()
    }
}

fn check(instrument: &'static str, value: f64) -> Result<f64, InvalidBalance> {
    if value.is_nan() || value < 0.0 {
        return Err(InvalidBalance { instrument, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_wallet_defaults_to_zero() {
        let wallet = PaymentWallet::from_partial(None, Some(20.0), None).unwrap();
        assert_eq!(wallet.cash(), 0.0);
        assert_eq!(wallet.credit_card(), 20.0);
        assert_eq!(wallet.farecard(), 0.0);
        assert_eq!(wallet.taxi_funds(), 20.0);
    }

    #[test]
    fn unlimited_is_default() {
        let wallet = PaymentWallet::default();
        assert_eq!(wallet, PaymentWallet::unlimited());
        assert!(wallet.farecard().is_infinite());
        assert!(wallet.taxi_funds().is_infinite());
    }

    #[test]
    fn taxi_funds_combine_cash_and_card() {
        let wallet = PaymentWallet::new(15.0, 25.0, 100.0).unwrap();
        assert_eq!(wallet.taxi_funds(), 40.0);
        assert_eq!(wallet.farecard(), 100.0);
    }

    #[test]
    fn rejects_negative_and_nan() {
        let err = PaymentWallet::new(-1.0, 0.0, 0.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid cash balance: -1");
        assert!(PaymentWallet::new(0.0, 0.0, f64::NAN).is_err());
    }
}
