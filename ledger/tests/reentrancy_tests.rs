mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use splitpay_ledger::{DistributionRequest, Ledger, LedgerError};
use splitpay_types::{Amount, Asset, Variant};

#[derive(Debug, Default)]
struct Observed {
    balance_during_push: Option<Amount>,
    nested: Vec<Result<Amount, LedgerError>>,
}

#[test]
fn withdraw_cannot_be_reentered_from_recipient() {
    let ledger = Rc::new(ledger(Variant::Escrow, 0));
    let host = funded_host();
    let req = native_request(vec![40, 60], 100);
    with_attached(&host, &req, || ledger.distribute_to_escrow(&req, &host)).unwrap();

    let observed = Rc::new(RefCell::new(Observed::default()));
    {
        let ledger = Rc::clone(&ledger);
        let observed = Rc::clone(&observed);
        host.on_receive(payee(0), move |h| {
            let balance = ledger.balance_of(&Asset::Native, &payee(0));
            let nested = ledger.withdraw(&payee(0), Asset::Native, h);
            let mut observed = observed.borrow_mut();
            observed.balance_during_push = Some(balance);
            observed.nested.push(nested);
        });
    }

    let paid = ledger.withdraw(&payee(0), Asset::Native, &host).unwrap();

    let observed = observed.borrow();
    assert_eq!(paid, 40);
    assert_eq!(observed.balance_during_push, Some(0));
    assert_eq!(observed.nested.len(), 1);
    assert!(matches!(observed.nested[0], Err(LedgerError::Reentrant)));
    assert_eq!(host.balance(&Asset::Native, &payee(0)), 40);
    assert_eq!(host.custody(&Asset::Native), 60);
    assert!(!ledger.is_locked());
}

#[test]
fn payout_recipient_cannot_start_another_distribution() {
    let ledger = Rc::new(ledger(Variant::Plain, 0));
    let host = funded_host();
    let outcome: Rc<RefCell<Option<LedgerError>>> = Rc::new(RefCell::new(None));
    {
        let ledger = Rc::clone(&ledger);
        let outcome = Rc::clone(&outcome);
        host.on_receive(payee(1), move |h| {
            let inner = token_request(vec![1]);
            if let Err(err) = ledger.pay(&inner, h) {
                *outcome.borrow_mut() = Some(err);
            }
        });
    }

    let req = native_request(vec![10, 20], 30);
    with_attached(&host, &req, || ledger.pay(&req, &host)).unwrap();

    assert!(matches!(*outcome.borrow(), Some(LedgerError::Reentrant)));
    assert_eq!(host.balance(&Asset::Native, &payee(1)), 20);
    assert_eq!(ledger.events().len(), 2);
    assert!(!ledger.is_locked());
}

#[test]
fn fee_withdrawal_is_guarded() {
    let ledger = Rc::new(ledger(Variant::EscrowFee, 100));
    let host = funded_host();
    let req = native_request(vec![1_000], 1_010);
    with_attached(&host, &req, || ledger.distribute_to_escrow(&req, &host)).unwrap();

    let nested: Rc<RefCell<Vec<Result<Amount, LedgerError>>>> = Rc::default();
    {
        let ledger = Rc::clone(&ledger);
        let nested = Rc::clone(&nested);
        host.on_receive(owner(), move |h| {
            let fees = ledger.withdraw_fees(&owner(), Asset::Native, h);
            let escrow = ledger.withdraw(&payee(0), Asset::Native, h);
            nested.borrow_mut().extend([fees, escrow]);
        });
    }

    assert_eq!(ledger.withdraw_fees(&owner(), Asset::Native, &host).unwrap(), 10);

    let nested = nested.borrow();
    assert!(nested.iter().all(|r| matches!(r, Err(LedgerError::Reentrant))));
    assert_eq!(ledger.balance_of(&Asset::Native, &payee(0)), 1_000);
    assert_eq!(ledger.accumulated_fees(&Asset::Native), 0);
    assert_eq!(host.custody(&Asset::Native), 1_000);
}

#[test]
fn queries_work_while_locked() {
    let ledger = Rc::new(ledger(Variant::Escrow, 0));
    let host = funded_host();
    let req = native_request(vec![5, 6], 11);
    with_attached(&host, &req, || ledger.distribute_to_escrow(&req, &host)).unwrap();

    let seen: Rc<RefCell<Option<(bool, Amount, String)>>> = Rc::default();
    {
        let ledger: Rc<Ledger> = Rc::clone(&ledger);
        let seen = Rc::clone(&seen);
        host.on_receive(payee(1), move |_| {
            *seen.borrow_mut() = Some((
                ledger.is_locked(),
                ledger.balance_of(&Asset::Native, &payee(0)),
                ledger.version().to_string(),
            ));
        });
    }

    ledger.withdraw(&payee(1), Asset::Native, &host).unwrap();

    assert_eq!(
        seen.borrow().clone(),
        Some((true, 5, "1.1.0-escrow".to_string()))
    );
    assert!(!ledger.is_locked());
}

#[test]
fn admin_changes_from_a_reverted_payout_do_not_survive() {
    let ledger = Rc::new(ledger(Variant::Fee, 100));
    let host = funded_host();
    host.reject_transfers_to(payee(1));

    let nested: Rc<RefCell<Vec<Result<(), LedgerError>>>> = Rc::default();
    {
        let ledger = Rc::clone(&ledger);
        let nested = Rc::clone(&nested);
        host.on_receive(owner(), move |_| {
            let fee = ledger.set_fee(&owner(), 0);
            let premium = ledger.set_premium_user(&owner(), caller(), true);
            nested.borrow_mut().extend([fee, premium]);
        });
    }

    let req = DistributionRequest::native(
        caller(),
        vec![owner(), payee(1)],
        vec![100, 200],
        303,
    );
    host.attach(caller(), 303).unwrap();
    assert!(matches!(ledger.pay(&req, &host), Err(LedgerError::Transfer(_))));

    let nested = nested.borrow();
    assert_eq!(nested.len(), 2);
    assert!(nested.iter().all(|r| matches!(r, Err(LedgerError::Reentrant))));
    assert_eq!(ledger.fee(), 100);
    assert!(!ledger.is_premium_user(&caller()));
    assert_eq!(ledger.accumulated_fees(&Asset::Native), 0);

    // Once nothing is in flight the owner can change them again.
    ledger.set_fee(&owner(), 0).unwrap();
    assert_eq!(ledger.fee(), 0);
}
