//! Demo deployment: one network, one reserve, one trade.

use anyhow::Result;
use rust_decimal_macros::dec;
use std::sync::Arc;
use swapnet_ledger::{InMemoryLedger, LedgerHandle, SelfAuthorizer};
use swapnet_network::{EngineConfig, NetworkEngine};
use swapnet_reserve::{spawn, Reserve};
use swapnet_types::{AccountId, Asset, Symbol};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let base = config.base_symbol()?;
    let tok = Symbol::new("TOK", 4)?;

    let network_id = AccountId::from(config.network_account.clone());
    let reserve_id = AccountId::from("reserve.a");
    let owner = AccountId::from("owner");
    let trader = AccountId::from("bob");
    let base_issuer = AccountId::from("sys.token");
    let token_issuer = AccountId::from("tok.token");

    let mut ledger = InMemoryLedger::new();
    for account in [&network_id, &reserve_id, &owner, &trader, &base_issuer, &token_issuer] {
        ledger.create_account(account.clone());
    }
    ledger.create_account(AccountId::from("alice"));
    ledger.issue(&base_issuer, &trader, &Asset::new(1_000_0000, base.clone()))?;
    ledger.issue(&token_issuer, &reserve_id, &Asset::new(1_000_000_0000, tok.clone()))?;
    let ledger = LedgerHandle::new(ledger);

    let auth = Arc::new(SelfAuthorizer);
    let mut reserve = Reserve::new(reserve_id.clone(), ledger.clone(), auth.clone());
    reserve.init(
        &reserve_id,
        owner.clone(),
        network_id.clone(),
        tok.clone(),
        token_issuer,
        base.clone(),
        base_issuer.clone(),
        true,
    )?;
    reserve.set_params(
        &owner,
        dec!(0.01),
        dec!(0.05),
        Asset::new(500_0000, base.clone()),
        Asset::new(500_0000, base.clone()),
        dec!(0.25),
        dec!(0.1),
        dec!(0.01),
    )?;

    let mut engine = NetworkEngine::new(network_id.clone(), base.clone(), ledger.clone(), auth);
    engine.init(&network_id, owner.clone(), base_issuer.clone(), true)?;
    engine.add_reserve(&owner, spawn(reserve))?;
    engine.list_pair(&owner, &reserve_id, tok.clone(), AccountId::from("tok.token"))?;

    let rate = engine
        .best_rate(&Asset::new(100_0000, base.clone()), &tok)
        .await?;
    info!(%rate, "best available rate");

    let receipt = engine
        .submit_trade(
            &trader,
            &Asset::new(100_0000, base),
            &base_issuer,
            "4 TOK,alice,1",
        )
        .await?;
    info!(
        trade_id = %receipt.trade_id,
        dest = %receipt.dest,
        receiver = %receipt.receiver,
        "trade complete"
    );
    Ok(())
}
