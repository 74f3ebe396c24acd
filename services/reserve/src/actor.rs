//! Tokio actor wrapper around [`Reserve`].
//!
//! The reserve runs as a spawned task draining an mpsc mailbox; the
//! orchestrator holds a cloneable [`ReserveHandle`] and awaits a oneshot
//! reply per command. Commands are processed strictly in mailbox order,
//! which is the ordering guarantee the trade pipeline builds on
//! (quote is always observable before the settle that follows it).

use crate::{Reserve, ReserveError, Settlement};
use swapnet_amm::RateQuote;
use swapnet_types::{AccountId, Asset};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use uuid::Uuid;

const MAILBOX_CAPACITY: usize = 64;

/// Commands a running reserve actor accepts.
#[derive(Debug)]
pub enum ReserveCommand {
    /// Compute and store a quote for one trade.
    Quote {
        trade_id: Uuid,
        src: Asset,
        reply: oneshot::Sender<Option<RateQuote>>,
    },
    /// Execute the reserve side of a settlement.
    Settle {
        trade_id: Uuid,
        from: AccountId,
        src: Asset,
        issuer: AccountId,
        memo: String,
        reply: oneshot::Sender<Result<Settlement, ReserveError>>,
    },
    /// Drop a stored quote that will not settle.
    ClearQuote {
        trade_id: Uuid,
        reply: oneshot::Sender<()>,
    },
    /// Compensation: restore the fee accumulator after an aborted trade.
    RestoreFees {
        previous: Asset,
        reply: oneshot::Sender<()>,
    },
    /// Read the current fee accumulator.
    CollectedFees {
        reply: oneshot::Sender<Option<Asset>>,
    },
}

/// Address of a running reserve actor.
#[derive(Debug, Clone)]
pub struct ReserveHandle {
    id: AccountId,
    tx: mpsc::Sender<ReserveCommand>,
}

impl ReserveHandle {
    /// Build a handle from raw parts. Lets embedders supply their own
    /// actor loop as long as it speaks [`ReserveCommand`].
    pub fn from_parts(id: AccountId, tx: mpsc::Sender<ReserveCommand>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    async fn send(&self, command: ReserveCommand) -> Result<(), ReserveError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| ReserveError::ActorUnavailable)
    }

    pub async fn quote(
        &self,
        trade_id: Uuid,
        src: Asset,
    ) -> Result<Option<RateQuote>, ReserveError> {
        let (reply, rx) = oneshot::channel();
        self.send(ReserveCommand::Quote {
            trade_id,
            src,
            reply,
        })
        .await?;
        rx.await.map_err(|_| ReserveError::ActorUnavailable)
    }

    pub async fn settle(
        &self,
        trade_id: Uuid,
        from: AccountId,
        src: Asset,
        issuer: AccountId,
        memo: String,
    ) -> Result<Settlement, ReserveError> {
        let (reply, rx) = oneshot::channel();
        self.send(ReserveCommand::Settle {
            trade_id,
            from,
            src,
            issuer,
            memo,
            reply,
        })
        .await?;
        rx.await.map_err(|_| ReserveError::ActorUnavailable)?
    }

    pub async fn clear_quote(&self, trade_id: Uuid) -> Result<(), ReserveError> {
        let (reply, rx) = oneshot::channel();
        self.send(ReserveCommand::ClearQuote { trade_id, reply }).await?;
        rx.await.map_err(|_| ReserveError::ActorUnavailable)
    }

    pub async fn restore_fees(&self, previous: Asset) -> Result<(), ReserveError> {
        let (reply, rx) = oneshot::channel();
        self.send(ReserveCommand::RestoreFees { previous, reply })
            .await?;
        rx.await.map_err(|_| ReserveError::ActorUnavailable)
    }

    pub async fn collected_fees(&self) -> Result<Option<Asset>, ReserveError> {
        let (reply, rx) = oneshot::channel();
        self.send(ReserveCommand::CollectedFees { reply }).await?;
        rx.await.map_err(|_| ReserveError::ActorUnavailable)
    }
}

/// Spawn a reserve actor task and return its handle.
pub fn spawn(reserve: Reserve) -> ReserveHandle {
    let id = reserve.id().clone();
    let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
    tokio::spawn(run(reserve, rx));
    ReserveHandle { id, tx }
}

async fn run(mut reserve: Reserve, mut rx: mpsc::Receiver<ReserveCommand>) {
    debug!(reserve = %reserve.id(), "reserve actor started");
    while let Some(command) = rx.recv().await {
        match command {
            ReserveCommand::Quote {
                trade_id,
                src,
                reply,
            } => {
                let _ = reply.send(reserve.quote(trade_id, &src));
            }
            ReserveCommand::Settle {
                trade_id,
                from,
                src,
                issuer,
                memo,
                reply,
            } => {
                let _ = reply.send(reserve.settle(trade_id, &from, &src, &issuer, &memo));
            }
            ReserveCommand::ClearQuote { trade_id, reply } => {
                reserve.clear_quote(trade_id);
                let _ = reply.send(());
            }
            ReserveCommand::RestoreFees { previous, reply } => {
                reserve.restore_fees(previous);
                let _ = reply.send(());
            }
            ReserveCommand::CollectedFees { reply } => {
                let _ = reply.send(reserve.collected_fees().cloned());
            }
        }
    }
    debug!(reserve = %reserve.id(), "reserve actor stopped");
}
