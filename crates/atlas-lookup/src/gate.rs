//! Credit gate.

use crate::error::{LookupError, Result};
use atlas_core::CreditBalance;

/// Charge one lookup against `balance`.
///
/// `Unbounded` always authorizes and comes back unchanged. `Finite(n)`
/// authorizes only when `n > 0` and comes back as `Finite(n - 1)`; otherwise
/// the lookup is refused and nothing is decremented.
///
/// # Errors
/// Returns `LookupError::InsufficientCredit` for `Finite(0)`.
pub fn authorize(balance: CreditBalance) -> Result<CreditBalance> {
    if !balance.has_credit() {
        return Err(LookupError::InsufficientCredit);
    }

    Ok(match balance {
        CreditBalance::Unbounded => CreditBalance::Unbounded,
        CreditBalance::Finite(n) => CreditBalance::Finite(n.saturating_sub(1)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_always_authorizes() {
        assert_eq!(
            authorize(CreditBalance::Unbounded),
            Ok(CreditBalance::Unbounded)
        );
    }

    #[test]
    fn test_finite_decrements_by_one() {
        assert_eq!(
            authorize(CreditBalance::Finite(1)),
            Ok(CreditBalance::Finite(0))
        );
        assert_eq!(
            authorize(CreditBalance::Finite(25)),
            Ok(CreditBalance::Finite(24))
        );
        assert_eq!(
            authorize(CreditBalance::Finite(u32::MAX)),
            Ok(CreditBalance::Finite(u32::MAX - 1))
        );
    }

    #[test]
    fn test_zero_is_refused() {
        assert_eq!(
            authorize(CreditBalance::Finite(0)),
            Err(LookupError::InsufficientCredit)
        );
    }

    #[test]
    fn test_repeated_charges_stop_at_zero() {
        let mut balance = CreditBalance::Finite(3);
        let mut granted = 0;
        while let Ok(next) = authorize(balance) {
            balance = next;
            granted += 1;
        }
        assert_eq!(granted, 3);
        assert_eq!(balance, CreditBalance::Finite(0));
    }
}
