//! Pooled dispatch: nonce assignment, bounded concurrency and pool barriers.
//!
//! A run of `T` transactions with pool size `P` executes `ceil(T / P)` pools
//! one after another. Within a pool every send runs as its own task; the next
//! pool starts only when all tasks of the current one have finished. Nonces are
//! assigned by the dispatcher, in launch order, before each task is spawned.
//! From the third pool on, the baseline is optionally re-read from the network.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use shardblast_rpc::NodeRpc;
use shardblast_types::{Address, ChainId, SendRequest, ShardId};
use shardblast_utils::{format_elapsed, StatsCounter};
use shardblast_wallet::TxSigner;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::broadcaster::{Broadcaster, Confirmation, SendOutcome};
use crate::nonce::{NonceCounter, Refresh};
use crate::receivers::ReceiverSource;
use crate::SenderError;

const SUCCEEDED: &str = "succeeded";
const FAILED: &str = "failed";
const TIMED_OUT: &str = "timed_out";
const CONFIRMED: &str = "confirmed";

/// How `T` transactions split into pools of at most `P`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchPlan {
    total: usize,
    pool_size: usize,
}

impl DispatchPlan {
    pub fn new(total: usize, pool_size: usize) -> Result<Self, SenderError> {
        if total == 0 || pool_size == 0 {
            return Err(SenderError::Config(format!(
                "tx count ({total}) and pool size ({pool_size}) must both be positive"
            )));
        }
        Ok(Self { total, pool_size })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn pool_count(&self) -> usize {
        self.total.div_ceil(self.pool_size)
    }

    /// Number of sends in pool `pool`; only the last pool may be short.
    pub fn pool_len(&self, pool: usize) -> usize {
        self.pool_size
            .min(self.total.saturating_sub(pool * self.pool_size))
    }

    pub fn pool_sizes(&self) -> Vec<usize> {
        (0..self.pool_count()).map(|k| self.pool_len(k)).collect()
    }

    /// Fail unless every send of the plan can get a nonce counting up from `baseline`.
    pub fn check_nonce_space(&self, baseline: u64) -> Result<(), SenderError> {
        NonceCounter::new(baseline).reserve(self.total).map(|_| ())
    }

    /// Whether the nonce is re-read before `pool` when refreshing is enabled.
    pub fn refreshes_before(&self, pool: usize) -> bool {
        pool > 1
    }
}

/// Where the dispatcher is in its run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    NonceRefresh { pool: usize },
    PoolRunning { pool: usize },
    PoolComplete { pool: usize },
    Done,
}

/// The parts of a send request shared by every transaction of a run.
#[derive(Clone, Debug)]
pub struct RequestTemplate {
    pub sender: Address,
    pub sender_shard: ShardId,
    pub receiver_shard: ShardId,
    pub amount: f64,
    pub gas_price: u64,
    pub payload: Option<Arc<[u8]>>,
}

impl RequestTemplate {
    pub fn request(&self, receiver: String, nonce: u64) -> SendRequest {
        SendRequest {
            sender: self.sender.clone(),
            sender_shard: self.sender_shard,
            receiver,
            receiver_shard: self.receiver_shard,
            amount: self.amount,
            gas_price: self.gas_price,
            nonce,
            payload: self.payload.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DispatchOptions {
    pub chain: ChainId,
    /// Re-read the nonce from the network before later pools.
    pub refresh_nonce: bool,
    /// Upper bound on building, signing and broadcasting one transaction.
    /// The confirmation wait is bounded separately.
    pub task_timeout: Option<Duration>,
    pub confirmation_wait: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            chain: ChainId::default(),
            refresh_nonce: true,
            task_timeout: Some(Duration::from_secs(60)),
            confirmation_wait: None,
        }
    }
}

/// One dispatched transaction and how it ended.
#[derive(Debug)]
pub struct SendAttempt {
    pub pool: usize,
    pub nonce: u64,
    pub receiver: String,
    pub result: Result<SendOutcome, SenderError>,
}

/// Aggregate counts of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub confirmed: u64,
    pub pools: usize,
    pub elapsed_ms: u128,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} transactions in {} pools: {} succeeded, {} failed, {} timed out, {} confirmed ({})",
            self.total,
            self.pools,
            self.succeeded,
            self.failed,
            self.timed_out,
            self.confirmed,
            format_elapsed(Duration::from_millis(self.elapsed_ms as u64)),
        )
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Attempts in launch order.
    pub attempts: Vec<SendAttempt>,
    pub summary: RunSummary,
    /// The nonce a follow-up run would start from if nothing was refreshed.
    pub next_nonce: u64,
}

impl RunReport {
    pub fn nonces(&self) -> Vec<u64> {
        self.attempts.iter().map(|a| a.nonce).collect()
    }
}

/// Runs a [`DispatchPlan`] against a node with one signer.
pub struct Dispatcher<N, S> {
    rpc: Arc<N>,
    broadcaster: Arc<Broadcaster<N, S>>,
    receivers: ReceiverSource,
    template: RequestTemplate,
    plan: DispatchPlan,
    options: DispatchOptions,
    rng: StdRng,
    state: DispatchState,
}

impl<N, S> Dispatcher<N, S>
where
    N: NodeRpc + 'static,
    S: TxSigner + 'static,
{
    pub fn new(
        rpc: Arc<N>,
        signer: Arc<S>,
        receivers: ReceiverSource,
        template: RequestTemplate,
        plan: DispatchPlan,
        options: DispatchOptions,
    ) -> Self {
        let broadcaster = Broadcaster::new(Arc::clone(&rpc), signer, options.chain)
            .with_confirmation_wait(options.confirmation_wait);
        Self {
            rpc,
            broadcaster: Arc::new(broadcaster),
            receivers,
            template,
            plan,
            options,
            rng: StdRng::from_entropy(),
            state: DispatchState::Idle,
        }
    }

    /// Use `rng` for receiver selection.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn plan(&self) -> &DispatchPlan {
        &self.plan
    }

    /// Send every transaction of the plan, starting at nonce `baseline`.
    ///
    /// Per-transaction failures are recorded in the report. The run aborts
    /// only on a failed nonce refresh or when nonces would run out, and never
    /// with a pool half spawned.
    pub async fn run(&mut self, baseline: u64) -> Result<RunReport, SenderError> {
        let started = Instant::now();
        let stats = Arc::new(StatsCounter::new(&[SUCCEEDED, FAILED, TIMED_OUT, CONFIRMED]));
        self.plan.check_nonce_space(baseline)?;
        let mut counter = NonceCounter::new(baseline);
        let mut attempts = Vec::with_capacity(self.plan.total());

        tracing::info!(
            total = self.plan.total(),
            pools = self.plan.pool_count(),
            baseline,
            refresh = self.options.refresh_nonce,
            "starting dispatch"
        );

        for pool in 0..self.plan.pool_count() {
            if self.options.refresh_nonce && self.plan.refreshes_before(pool) {
                self.refresh(pool, &mut counter).await?;
            }

            self.state = DispatchState::PoolRunning { pool };
            let pool_len = self.plan.pool_len(pool);
            // Every request of the pool exists before the first task is spawned.
            let nonces = counter.reserve(pool_len)?;
            let mut requests = Vec::with_capacity(pool_len);
            for nonce in nonces {
                let receiver = self.receivers.pick(&mut self.rng)?.to_string();
                requests.push(self.template.request(receiver, nonce));
            }

            let mut tasks = JoinSet::new();
            for (slot, request) in requests.into_iter().enumerate() {
                let broadcaster = Arc::clone(&self.broadcaster);
                let stats = Arc::clone(&stats);
                let timeout = self.options.task_timeout;
                tasks.spawn(async move {
                    let submitted = match timeout {
                        Some(limit) => tokio::time::timeout(limit, broadcaster.submit(&request))
                            .await
                            .unwrap_or(Err(SenderError::Timeout(limit))),
                        None => broadcaster.submit(&request).await,
                    };
                    // The confirmation wait has its own budget and never fails an accepted send.
                    let result = match submitted {
                        Ok(mut outcome) => {
                            outcome.confirmation = broadcaster.confirm(&outcome.receipt).await;
                            Ok(outcome)
                        }
                        Err(e) => Err(e),
                    };
                    record(&stats, &request, &result);
                    let attempt = SendAttempt {
                        pool,
                        nonce: request.nonce,
                        receiver: request.receiver,
                        result,
                    };
                    (slot, attempt)
                });
            }

            let mut finished: Vec<Option<SendAttempt>> = (0..pool_len).map(|_| None).collect();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((slot, attempt)) => finished[slot] = Some(attempt),
                    Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                    Err(e) => tracing::error!(pool, "send task cancelled: {e}"),
                }
            }
            attempts.extend(finished.into_iter().flatten());

            self.state = DispatchState::PoolComplete { pool };
            tracing::info!(pool, size = pool_len, next_nonce = counter.peek(), "pool complete");
        }

        self.state = DispatchState::Done;
        let summary = RunSummary {
            total: attempts.len(),
            succeeded: stats.get(SUCCEEDED),
            failed: stats.get(FAILED),
            timed_out: stats.get(TIMED_OUT),
            confirmed: stats.get(CONFIRMED),
            pools: self.plan.pool_count(),
            elapsed_ms: started.elapsed().as_millis(),
        };
        tracing::info!(%summary, "dispatch finished");
        Ok(RunReport {
            attempts,
            summary,
            next_nonce: counter.peek(),
        })
    }

    async fn refresh(&mut self, pool: usize, counter: &mut NonceCounter) -> Result<(), SenderError> {
        self.state = DispatchState::NonceRefresh { pool };
        let fresh = self
            .rpc
            .next_nonce(&self.template.sender)
            .await
            .map_err(|e| {
                tracing::error!(pool, "nonce refresh failed: {e}");
                SenderError::from(e)
            })?;
        match counter.refresh(fresh) {
            Refresh::Regressed { from } => tracing::warn!(
                pool,
                from,
                to = fresh,
                "network nonce is behind locally assigned nonces; adopting it"
            ),
            _ => tracing::info!(pool, nonce = fresh, "nonce refreshed"),
        }
        Ok(())
    }
}

fn record(stats: &StatsCounter, request: &SendRequest, result: &Result<SendOutcome, SenderError>) {
    match result {
        Ok(outcome) => {
            stats.increment(SUCCEEDED);
            if outcome.confirmation == Confirmation::Confirmed {
                stats.increment(CONFIRMED);
            }
            tracing::info!(
                from = %request.sender,
                from_shard = %request.sender_shard,
                to = %request.receiver,
                to_shard = %request.receiver_shard,
                cross_shard = request.is_cross_shard(),
                amount = request.amount,
                nonce = request.nonce,
                receipt = %outcome.receipt,
                confirmation = ?outcome.confirmation,
                "transaction sent"
            );
        }
        Err(e) => {
            stats.increment(match e {
                SenderError::Timeout(_) => TIMED_OUT,
                _ => FAILED,
            });
            tracing::warn!(
                from = %request.sender,
                from_shard = %request.sender_shard,
                to = %request.receiver,
                to_shard = %request.receiver_shard,
                nonce = request.nonce,
                error = %e,
                "transaction failed"
            );
        }
    }
}
