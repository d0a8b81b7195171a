//! Reconciliation pipeline

use quorum_batch::{Batch, BatchBuilder, PlanSummary, TransactionAssembler};
use quorum_core::{Address, QuorumResult, SafeState, Threshold};
use quorum_state::{align_owners, edit_script, EditOperation};

use crate::{ReconcileConfig, StateFetcher};

/// Source of the batch creation timestamp
pub trait Clock {
    /// Current time in epoch milliseconds
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock frozen at a given instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Desired end state for one multisig
#[derive(Clone, Debug)]
pub struct ReconcileRequest {
    pub safe: Address,
    pub desired_owners: Vec<Address>,
    /// Keeps the current threshold when unset
    pub threshold: Option<Threshold>,
}

impl ReconcileRequest {
    pub fn new(safe: Address, desired_owners: Vec<Address>) -> Self {
        ReconcileRequest {
            safe,
            desired_owners,
            threshold: None,
        }
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// Result of a reconciliation run
#[derive(Clone, Debug)]
pub struct Reconciliation {
    /// Snapshot the batch was planned against
    pub state: SafeState,
    pub operations: Vec<EditOperation>,
    pub summary: PlanSummary,
    pub batch: Batch,
}

/// Owner reconciliation pipeline
pub struct Reconciler<F, C = SystemClock> {
    fetcher: F,
    config: ReconcileConfig,
    clock: C,
}

impl<F: StateFetcher> Reconciler<F, SystemClock> {
    pub fn new(fetcher: F, config: ReconcileConfig) -> Self {
        Reconciler {
            fetcher,
            config,
            clock: SystemClock,
        }
    }
}

impl<F: StateFetcher, C: Clock> Reconciler<F, C> {
    pub fn with_clock(fetcher: F, config: ReconcileConfig, clock: C) -> Self {
        Reconciler {
            fetcher,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Fetch current state and produce the proposal batch
    pub fn run(&self, request: &ReconcileRequest) -> QuorumResult<Reconciliation> {
        let span = tracing::info_span!("reconcile", safe = %request.safe);
        let _enter = span.enter();

        self.config.validate()?;
        let state = self.fetcher.fetch(request.safe)?;
        self.plan(state, request)
    }

    /// Produce the proposal batch against an already fetched snapshot
    pub fn plan(&self, state: SafeState, request: &ReconcileRequest) -> QuorumResult<Reconciliation> {
        let aligned = align_owners(&state.owners, &request.desired_owners)?;
        let target = request.threshold.unwrap_or(state.threshold);
        let assembler = TransactionAssembler::new(&state, aligned.len(), target)?;

        let operations = edit_script(state.owners.as_slice(), aligned.as_slice())?;
        let assembly = assembler.assemble(&operations)?;
        tracing::info!(
            operations = operations.len(),
            transactions = assembly.transactions.len(),
            plan = %assembly.summary,
            "reconciliation planned"
        );

        let description = self
            .config
            .batch_description
            .clone()
            .unwrap_or_else(|| assembly.summary.to_string());

        let batch = BatchBuilder::new(
            self.config.chain_id.clone(),
            state.address,
            self.clock.now_millis(),
        )
        .name(self.config.batch_name.clone())
        .description(description)
        .tx_builder_version(self.config.tx_builder_version.clone())
        .proposer(self.config.proposer)
        .transactions(assembly.transactions)
        .build()?;

        Ok(Reconciliation {
            state,
            operations,
            summary: assembly.summary,
            batch,
        })
    }
}
