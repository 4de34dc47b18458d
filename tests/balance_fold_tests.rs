mod common;

use duo_ledger::domain::balance::{Standing, apply_payment};
use duo_ledger::domain::money::Amount;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Payments as (paid by Julia?, cents).
fn payments_strategy() -> impl Strategy<Value = Vec<(bool, i64)>> {
    prop::collection::vec((any::<bool>(), 1i64..1_000_000), 1..40)
}

fn settled_or(standing: Standing) -> Option<Standing> {
    (!standing.is_settled()).then_some(standing)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn final_balance_is_fold_of_payments(payments in payments_strategy()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let ledger = common::in_memory_ledger().await;
            let julia = ledger.participant("Julia").unwrap().id;
            let jack = ledger.participant("Jack").unwrap().id;

            let mut folded = None;
            let mut net = Decimal::ZERO;
            for (by_julia, cents) in &payments {
                let amount = Decimal::new(*cents, 2);
                let (name, id) = if *by_julia { ("Julia", julia) } else { ("Jack", jack) };
                ledger.record_payment(name, "Dollar", amount, "-").await.unwrap();

                folded = Some(apply_payment(folded, id, Amount::new(amount).unwrap()).unwrap());
                net += if *by_julia { amount } else { -amount };
            }

            let stored = ledger
                .get_balance("Dollar")
                .await
                .unwrap()
                .map(|b| Standing::new(b.creditor.id, b.amount));
            prop_assert_eq!(stored, folded.and_then(settled_or));

            // The single net value equals the signed sum of contributions.
            let expected = match net.cmp(&Decimal::ZERO) {
                std::cmp::Ordering::Greater => Some(Standing::new(julia, net)),
                std::cmp::Ordering::Less => Some(Standing::new(jack, -net)),
                std::cmp::Ordering::Equal => None,
            };
            prop_assert_eq!(stored, expected);
            prop_assert_eq!(ledger.list_payments(Some("Dollar")).await.unwrap().len(), payments.len());
            Ok(())
        })?;
    }

    #[test]
    fn apply_payment_never_goes_negative(
        creditor_is_julia in any::<bool>(),
        current in 0i64..1_000_000,
        paid in 1i64..1_000_000,
        payer_is_julia in any::<bool>(),
    ) {
        use duo_ledger::domain::participant::ParticipantId;
        let id = |julia: bool| if julia { ParticipantId(1) } else { ParticipantId(2) };

        let current = Standing::new(id(creditor_is_julia), Decimal::new(current, 2));
        let next = apply_payment(Some(current), id(payer_is_julia), Amount::new(Decimal::new(paid, 2)).unwrap()).unwrap();
        prop_assert!(next.amount >= Decimal::ZERO);
    }
}

#[test]
fn documented_transitions() {
    use duo_ledger::domain::participant::ParticipantId;
    use rust_decimal_macros::dec;

    let a = ParticipantId(1);
    let b = ParticipantId(2);
    let amount = |v: Decimal| Amount::new(v).unwrap();

    assert_eq!(apply_payment(None, a, amount(dec!(10.00))).unwrap(), Standing::new(a, dec!(10.00)));
    let owed = Some(Standing::new(a, dec!(10.00)));
    assert_eq!(apply_payment(owed, b, amount(dec!(4.00))).unwrap(), Standing::new(a, dec!(6.00)));
    assert_eq!(apply_payment(owed, b, amount(dec!(10.00))).unwrap(), Standing::new(a, dec!(0)));
    assert_eq!(apply_payment(owed, b, amount(dec!(15.00))).unwrap(), Standing::new(b, dec!(5.00)));
}
