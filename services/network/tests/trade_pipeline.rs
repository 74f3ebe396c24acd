//! End-to-end trade pipeline tests: intake, fan-out, selection,
//! settlement, verification, and full rollback on abort.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use swapnet_amm::RateQuote;
use swapnet_ledger::{InMemoryLedger, LedgerHandle, SelfAuthorizer};
use swapnet_network::{NetworkEngine, NetworkError};
use swapnet_reserve::{spawn, Reserve, ReserveCommand, ReserveHandle, Settlement};
use swapnet_types::{AccountId, Asset, Symbol};
use tokio::sync::mpsc;

fn sys() -> Symbol {
    Symbol::new("SYS", 4).unwrap()
}

fn tok() -> Symbol {
    Symbol::new("TOK", 4).unwrap()
}

struct Deployment {
    engine: NetworkEngine,
    ledger: LedgerHandle,
    reserve_handle: ReserveHandle,
    owner: AccountId,
    trader: AccountId,
    base_issuer: AccountId,
    token_issuer: AccountId,
    reserve_id: AccountId,
}

/// One network, one real reserve listed for TOK/SYS.
///
/// Reserve curve: r = 0.0001, p_min = 0.9, so a 100 SYS buy quotes a
/// rate a little above 1.10. `reserve_base` seeds the reserve's base
/// inventory (shifts the curve up for sell-direction tests).
fn deploy(fee_percent: Decimal, reserve_base: i64) -> Deployment {
    let mut ledger = InMemoryLedger::new();
    let network_id = AccountId::from("network");
    let reserve_id = AccountId::from("reserve.a");
    let owner = AccountId::from("owner");
    let trader = AccountId::from("bob");
    let base_issuer = AccountId::from("sys.token");
    let token_issuer = AccountId::from("tok.token");
    for account in [&network_id, &reserve_id, &owner, &trader, &base_issuer, &token_issuer] {
        ledger.create_account(account.clone());
    }
    ledger.create_account(AccountId::from("alice"));
    ledger
        .issue(&base_issuer, &trader, &Asset::new(1_000_0000, sys()))
        .unwrap();
    ledger
        .issue(&token_issuer, &trader, &Asset::new(1_000_0000, tok()))
        .unwrap();
    ledger
        .issue(&token_issuer, &reserve_id, &Asset::new(100_000_0000, tok()))
        .unwrap();
    if reserve_base > 0 {
        ledger
            .issue(&base_issuer, &reserve_id, &Asset::new(reserve_base, sys()))
            .unwrap();
    }
    let ledger = LedgerHandle::new(ledger);
    let auth = Arc::new(SelfAuthorizer);

    let mut reserve = Reserve::new(reserve_id.clone(), ledger.clone(), auth.clone());
    reserve
        .init(
            &reserve_id,
            owner.clone(),
            network_id.clone(),
            tok(),
            token_issuer.clone(),
            sys(),
            base_issuer.clone(),
            true,
        )
        .unwrap();
    reserve
        .set_params(
            &owner,
            dec!(0.0001),
            dec!(0.9),
            Asset::new(1_000_0000, sys()),
            Asset::new(1_000_0000, sys()),
            fee_percent,
            dec!(2),
            dec!(0.5),
        )
        .unwrap();
    let reserve_handle = spawn(reserve);

    let mut engine = NetworkEngine::new(network_id.clone(), sys(), ledger.clone(), auth);
    engine
        .init(&network_id, owner.clone(), base_issuer.clone(), true)
        .unwrap();
    engine.add_reserve(&owner, reserve_handle.clone()).unwrap();
    engine
        .list_pair(&owner, &reserve_id, tok(), token_issuer.clone())
        .unwrap();

    Deployment {
        engine,
        ledger,
        reserve_handle,
        owner,
        trader,
        base_issuer,
        token_issuer,
        reserve_id,
    }
}

fn balance(d: &Deployment, account: &str, issuer: &AccountId, symbol: Symbol) -> i64 {
    use swapnet_ledger::Ledger;
    d.ledger
        .balance_of(&AccountId::from(account), issuer, &symbol)
        .amount()
}

#[tokio::test]
async fn buy_trade_settles_and_pays_the_receiver() {
    let mut d = deploy(dec!(0), 0);
    let receipt = d
        .engine
        .submit_trade(
            &d.trader.clone(),
            &Asset::new(100_0000, sys()),
            &d.base_issuer.clone(),
            "4 TOK,alice,1.05",
        )
        .await
        .unwrap();

    assert!(receipt.rate > dec!(1.05) && receipt.rate < dec!(1.2));
    assert_eq!(receipt.receiver, AccountId::from("alice"));
    assert_eq!(receipt.src, Asset::new(100_0000, sys()));

    // receiver got exactly the promised amount, trader paid exactly src
    assert_eq!(
        balance(&d, "alice", &d.token_issuer, tok()),
        receipt.dest.amount()
    );
    assert_eq!(balance(&d, "bob", &d.base_issuer, sys()), 900_0000);
    assert_eq!(balance(&d, "reserve.a", &d.base_issuer, sys()), 100_0000);
}

#[tokio::test]
async fn sell_trade_pays_base_to_the_receiver() {
    let mut d = deploy(dec!(0), 500_0000);
    let receipt = d
        .engine
        .submit_trade(
            &d.trader.clone(),
            &Asset::new(100_0000, tok()),
            &d.token_issuer.clone(),
            "4 SYS,alice,0.5",
        )
        .await
        .unwrap();

    assert!(receipt.rate > dec!(0.9) && receipt.rate < dec!(1));
    assert_eq!(
        balance(&d, "alice", &d.base_issuer, sys()),
        receipt.dest.amount()
    );
    assert_eq!(balance(&d, "reserve.a", &d.token_issuer, tok()), 100_100_0000);
}

#[tokio::test]
async fn rate_below_minimum_aborts_without_side_effects() {
    let mut d = deploy(dec!(0), 0);
    let err = d
        .engine
        .submit_trade(
            &d.trader.clone(),
            &Asset::new(100_0000, sys()),
            &d.base_issuer.clone(),
            "4 TOK,alice,1.5",
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "rate smaller than min conversion rate");
    assert_eq!(balance(&d, "bob", &d.base_issuer, sys()), 1_000_0000);
    assert_eq!(balance(&d, "alice", &d.token_issuer, tok()), 0);
    assert_eq!(balance(&d, "network", &d.base_issuer, sys()), 0);
}

#[tokio::test]
async fn unquotable_trade_aborts_when_every_reserve_abstains() {
    let mut d = deploy(dec!(0), 0);
    // the reserve holds no base inventory, so no sell payout can be funded
    let err = d
        .engine
        .submit_trade(
            &d.trader.clone(),
            &Asset::new(950_0000, tok()),
            &d.token_issuer.clone(),
            "4 SYS,alice,0.0001",
        )
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::NoAvailableRate);
    assert_eq!(balance(&d, "bob", &d.token_issuer, tok()), 1_000_0000);
}

#[tokio::test]
async fn intake_guards_reject_malformed_trades() {
    let mut d = deploy(dec!(0), 0);
    let trader = d.trader.clone();
    let base_issuer = d.base_issuer.clone();
    let token_issuer = d.token_issuer.clone();
    let src = Asset::new(100_0000, sys());

    let err = d
        .engine
        .submit_trade(&trader, &src, &base_issuer, "4 OTH,alice,1")
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::UnlistedToken);

    let err = d
        .engine
        .submit_trade(&trader, &src, &base_issuer, "4 SYS,alice,1")
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::SameSymbol);

    // right code, wrong precision: not the listed token
    let err = d
        .engine
        .submit_trade(&trader, &src, &base_issuer, "5 TOK,alice,1")
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::UnlistedToken);

    let err = d
        .engine
        .submit_trade(
            &trader,
            &Asset::new(100_0000, tok()),
            &token_issuer,
            "4 OTH,alice,1",
        )
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::NoBaseSide);

    // spoofed issuer for the source side
    let err = d
        .engine
        .submit_trade(&trader, &src, &token_issuer, "4 TOK,alice,1")
        .await
        .unwrap_err();
    assert!(matches!(err, NetworkError::IssuerMismatch { .. }));

    let err = d
        .engine
        .submit_trade(&trader, &src, &base_issuer, "")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "needs a memo with transaction details");

    let owner = d.owner.clone();
    d.engine.set_enabled(&owner, false).unwrap();
    let err = d
        .engine
        .submit_trade(&trader, &src, &base_issuer, "4 TOK,alice,1")
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::Disabled);
    assert_eq!(balance(&d, "bob", &d.base_issuer, sys()), 1_000_0000);
}

#[tokio::test]
async fn fees_accrue_monotonically_across_trades() {
    let mut d = deploy(dec!(0.25), 0);
    let trader = d.trader.clone();
    let base_issuer = d.base_issuer.clone();

    d.engine
        .submit_trade(&trader, &Asset::new(50_0000, sys()), &base_issuer, "4 TOK,alice,1")
        .await
        .unwrap();
    let after_first = d.reserve_handle.collected_fees().await.unwrap().unwrap();
    assert!(after_first.is_positive());

    d.engine
        .submit_trade(&trader, &Asset::new(50_0000, sys()), &base_issuer, "4 TOK,alice,1")
        .await
        .unwrap();
    let after_second = d.reserve_handle.collected_fees().await.unwrap().unwrap();
    assert!(after_second.amount() > after_first.amount());
}

#[tokio::test]
async fn best_rate_is_a_read_only_probe() {
    let mut d = deploy(dec!(0), 0);
    let rate = d
        .engine
        .best_rate(&Asset::new(100_0000, sys()), &tok())
        .await
        .unwrap();
    assert!(rate > dec!(1.05));

    assert_eq!(balance(&d, "bob", &d.base_issuer, sys()), 1_000_0000);
    assert_eq!(balance(&d, "reserve.a", &d.base_issuer, sys()), 0);

    // probe quotes were cleared; a real trade still goes through
    d.engine
        .submit_trade(
            &d.trader.clone(),
            &Asset::new(100_0000, sys()),
            &d.base_issuer.clone(),
            "4 TOK,alice,1.05",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_settlement_payout_leaves_no_partial_state() {
    let mut d = deploy(dec!(0.25), 0);
    // the receiver named in the memo has no ledger account, so the
    // reserve's payout transfer fails inside settle
    let err = d
        .engine
        .submit_trade(
            &d.trader.clone(),
            &Asset::new(100_0000, sys()),
            &d.base_issuer.clone(),
            "4 TOK,ghost,1",
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "account ghost does not exist");

    // ledger rolled back and the reserve accrued nothing
    assert_eq!(balance(&d, "bob", &d.base_issuer, sys()), 1_000_0000);
    assert_eq!(balance(&d, "reserve.a", &d.base_issuer, sys()), 0);
    assert_eq!(balance(&d, "reserve.a", &d.token_issuer, tok()), 100_000_0000);
    let fees = d.reserve_handle.collected_fees().await.unwrap().unwrap();
    assert_eq!(fees.amount(), 0);
}

/// A reserve that quotes aggressively but never delivers the payout.
fn spawn_lying_reserve(id: AccountId) -> ReserveHandle {
    let (tx, mut rx) = mpsc::channel(8);
    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            match command {
                ReserveCommand::Quote { reply, .. } => {
                    let _ = reply.send(Some(RateQuote {
                        rate: dec!(5),
                        dest_amount: Asset::new(500_0000, tok()),
                    }));
                }
                ReserveCommand::Settle { reply, .. } => {
                    let _ = reply.send(Ok(Settlement {
                        receiver: AccountId::from("alice"),
                        dest: Asset::new(500_0000, tok()),
                        fee: Asset::zero(tok()),
                        previous_fees: Asset::zero(tok()),
                    }));
                }
                ReserveCommand::ClearQuote { reply, .. } => {
                    let _ = reply.send(());
                }
                ReserveCommand::RestoreFees { reply, .. } => {
                    let _ = reply.send(());
                }
                ReserveCommand::CollectedFees { reply } => {
                    let _ = reply.send(None);
                }
            }
        }
    });
    ReserveHandle::from_parts(id, tx)
}

#[tokio::test]
async fn failed_settlement_rolls_the_whole_trade_back() {
    let mut d = deploy(dec!(0), 0);
    let owner = d.owner.clone();
    let liar = AccountId::from("reserve.liar");
    d.ledger.create_account(liar.clone());
    d.engine
        .add_reserve(&owner, spawn_lying_reserve(liar.clone()))
        .unwrap();
    d.engine
        .list_pair(&owner, &liar, tok(), d.token_issuer.clone())
        .unwrap();

    // the liar's rate 5 beats the honest reserve, wins selection, takes
    // the source leg, then never pays the destination leg
    let err = d
        .engine
        .submit_trade(
            &d.trader.clone(),
            &Asset::new(100_0000, sys()),
            &d.base_issuer.clone(),
            "4 TOK,alice,1.05",
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "trade amount not added to dest");

    // every balance the trade touched was restored
    assert_eq!(balance(&d, "bob", &d.base_issuer, sys()), 1_000_0000);
    assert_eq!(balance(&d, "alice", &d.token_issuer, tok()), 0);
    assert_eq!(balance(&d, "network", &d.base_issuer, sys()), 0);
    assert_eq!(balance(&d, "reserve.liar", &d.base_issuer, sys()), 0);

    // once the liar is delisted, the honest reserve serves the next trade
    d.engine.delist_pair(&owner, &liar, "TOK").unwrap();
    let receipt = d
        .engine
        .submit_trade(
            &d.trader.clone(),
            &Asset::new(100_0000, sys()),
            &d.base_issuer.clone(),
            "4 TOK,alice,1.05",
        )
        .await
        .unwrap();
    assert_eq!(receipt.reserve, d.reserve_id);
}
