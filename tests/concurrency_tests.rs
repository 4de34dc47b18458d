mod common;

use duo_ledger::domain::payment::PaymentId;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

const WRITERS: usize = 16;
const PAYMENTS_PER_WRITER: usize = 25;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_writers_lose_no_updates() {
    let ledger = Arc::new(common::in_memory_ledger().await);

    let mut rng = rand::thread_rng();
    let plans: Vec<Vec<(bool, Decimal)>> = (0..WRITERS)
        .map(|_| {
            (0..PAYMENTS_PER_WRITER)
                .map(|_| (rng.gen_bool(0.5), Decimal::new(rng.gen_range(1..=50_000), 2)))
                .collect()
        })
        .collect();

    let expected_net: Decimal = plans
        .iter()
        .flatten()
        .map(|(by_julia, amount)| if *by_julia { *amount } else { -*amount })
        .sum();

    let mut handles = Vec::new();
    for plan in plans {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            for (by_julia, amount) in plan {
                let payer = if by_julia { "Julia" } else { "Jack" };
                ledger
                    .record_payment(payer, "Dollar", amount, "stress")
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let payments = ledger.list_payments(Some("Dollar")).await.unwrap();
    assert_eq!(payments.len(), WRITERS * PAYMENTS_PER_WRITER);
    let ids: Vec<PaymentId> = payments.iter().map(|p| p.id).collect();
    let sequential: Vec<PaymentId> = (1..=payments.len() as u64).map(PaymentId).collect();
    assert_eq!(ids, sequential);

    let balance = ledger.get_balance("Dollar").await.unwrap();
    let actual_net = match balance {
        Some(b) if b.creditor.name == "Julia" => b.amount,
        Some(b) => -b.amount,
        None => Decimal::ZERO,
    };
    assert_eq!(actual_net, expected_net);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_run_alongside_writers() {
    let ledger = Arc::new(common::in_memory_ledger().await);

    let writer = {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                ledger
                    .record_payment("Julia", "Euro", Decimal::new(100, 2), "-")
                    .await
                    .unwrap();
            }
        })
    };

    let reader = {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let before = ledger.list_payments(Some("Euro")).await.unwrap().len();
                let balance = ledger.get_balance("Euro").await.unwrap();
                let after = ledger.list_payments(Some("Euro")).await.unwrap().len();
                // Julia only ever pays in, so the balance counts whole payments.
                let seen = balance.map(|b| b.amount).unwrap_or_default();
                assert!(seen >= Decimal::from(before as u64));
                assert!(seen <= Decimal::from(after as u64));
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
    assert_eq!(
        ledger.get_balance("Euro").await.unwrap().unwrap().amount,
        Decimal::from(200)
    );
}
