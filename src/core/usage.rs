use super::account::{AccountType, Flexibility, Transaction};
use super::allowance::AllowanceError;
use rust_decimal::Decimal;

/// Allowance used by one account's transactions.
///
/// Transactions must already be restricted to the tax year being assessed.
/// Non-flexible accounts count subscriptions only; flexible accounts net
/// withdrawals against subscriptions, never going below zero.
pub fn account_usage<'a, I>(
    account_type: AccountType,
    transactions: I,
) -> Result<Decimal, AllowanceError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let amounts = transactions.into_iter().map(|t| t.amount);
    match account_type.rule().flexibility {
        Flexibility::NonFlexible => checked_sum(amounts.filter(|a| a.is_sign_positive())),
        Flexibility::Flexible => Ok(checked_sum(amounts)?.max(Decimal::ZERO)),
    }
}

pub(crate) fn checked_add(total: Decimal, amount: Decimal) -> Result<Decimal, AllowanceError> {
    total.checked_add(amount).ok_or(AllowanceError::AmountOverflow)
}

fn checked_sum(mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal, AllowanceError> {
    amounts.try_fold(Decimal::ZERO, checked_add)
}
