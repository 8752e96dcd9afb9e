use mint_chain_client::{
    ChainError, ContractFactory, MintCountReader, MintedEventQueue, MintedEventSink, ProviderLookup,
    WalletProvider, count_reader, minted_channel,
};
use mint_types::{ChainId, ConnectionStatus, MintStatus, SessionSnapshot, TxHash, WalletAddress};
use std::cell::RefCell;
use tracing::{debug, info, warn};

use crate::MintConfig;
use crate::links;
use crate::status::{self, StatusBoard, StatusOrigin};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MintOperation {
    pub id: u64,
    pub status: MintStatus,
    pub transaction_hash: Option<TxHash>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintRejection {
    ProviderMissing,
    CapacityReached,
    InFlight,
    WrongNetwork,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintOutcome {
    Confirmed(TxHash),
    Failed(ChainError),
    /// Refused before any wallet interaction.
    Rejected(MintRejection),
}

#[derive(Debug, Default)]
struct SessionState {
    connection: ConnectionStatus,
    account: Option<WalletAddress>,
    chain_id: Option<ChainId>,
    minted_count: u64,
    busy: bool,
    status: StatusBoard,
    transaction_link: Option<String>,
    mint: MintOperation,
    next_operation_id: u64,
}

/// Single-threaded controller. Operations take `&self` and may interleave at
/// their suspension points; no `RefCell` borrow is held across an `.await`.
pub struct MintSessionController<L, F> {
    config: MintConfig,
    lookup: L,
    factory: F,
    state: RefCell<SessionState>,
    events_tx: MintedEventSink,
    events_rx: RefCell<MintedEventQueue>,
}

impl<L, F> MintSessionController<L, F>
where
    L: ProviderLookup,
    F: ContractFactory,
{
    pub fn new(config: MintConfig, lookup: L, factory: F) -> Self {
        let (events_tx, events_rx) = minted_channel();
        Self {
            config,
            lookup,
            factory,
            state: RefCell::new(SessionState::default()),
            events_tx,
            events_rx: RefCell::new(events_rx),
        }
    }

    pub fn config(&self) -> &MintConfig {
        &self.config
    }

    /// Page-load sequence: pick up an existing authorization, then the counter.
    pub async fn start(&self) {
        self.check_existing_connection().await;
        self.read_mint_count().await;
    }

    pub async fn check_existing_connection(&self) {
        let Some(provider) = self.lookup.provider() else {
            info!("no wallet provider detected");
            self.post(StatusOrigin::Connection, status::wallet_missing());
            return;
        };

        let accounts = match provider.accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!("failed to list authorized accounts: {}", err);
                return;
            }
        };

        match accounts.first() {
            Some(account) => {
                let account = WalletAddress::normalized(account.as_str());
                info!(%account, "found an authorized account");
                self.mark_connected(account.clone());
                self.post(StatusOrigin::Connection, status::found_account(&account));
            }
            None => debug!("no authorized accounts found"),
        }
    }

    /// Must be driven by a user gesture; the wallet may show a prompt.
    pub async fn connect_wallet(&self) {
        let Some(provider) = self.lookup.provider() else {
            self.post(StatusOrigin::Connection, status::wallet_missing());
            return;
        };

        let accounts = match provider.request_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!("wallet authorization failed: {}", err);
                return;
            }
        };

        let Some(account) = accounts.first() else {
            warn!("wallet authorized no accounts");
            return;
        };
        let account = WalletAddress::normalized(account.as_str());
        info!(%account, "wallet connected");
        self.mark_connected(account.clone());
        self.post(StatusOrigin::Connection, status::connected(&account));

        self.check_network(provider.as_ref()).await;
        self.subscribe_minted();
    }

    /// Refresh the counter. Failures leave the last known value in place.
    pub async fn read_mint_count(&self) -> Option<u64> {
        let connected = self.connection() == ConnectionStatus::Connected;
        let provider_present = self.lookup.provider().is_some();
        let reader = match count_reader(&self.factory, provider_present, connected) {
            Ok(reader) => reader,
            Err(err) => {
                warn!("mint count not read: {}", err);
                return None;
            }
        };

        match reader.total_minted_count().await {
            Ok(count) => Some(self.record_count(count)),
            Err(err) => {
                warn!(reader = ?reader.kind(), "mint count read failed: {}", err);
                None
            }
        }
    }

    pub async fn submit_mint(&self) -> MintOutcome {
        if self.mint_in_flight() {
            debug!("mint already in flight, ignoring submit");
            return MintOutcome::Rejected(MintRejection::InFlight);
        }

        let Some(provider) = self.lookup.provider() else {
            self.post(StatusOrigin::Connection, status::wallet_missing());
            return MintOutcome::Rejected(MintRejection::ProviderMissing);
        };

        let (count, capacity) = (self.minted_count(), self.config.capacity);
        if count >= capacity {
            info!(count, capacity, "mint capacity reached");
            return MintOutcome::Rejected(MintRejection::CapacityReached);
        }

        // Claimed before the first suspension point so a second submit bounces.
        self.set_busy(true);

        if self.config.require_network_match && !self.check_network(provider.as_ref()).await {
            self.set_busy(false);
            return MintOutcome::Rejected(MintRejection::WrongNetwork);
        }

        let operation = self.begin_operation();
        self.post(StatusOrigin::Mint, status::awaiting_signature());

        let contract = match self.factory.signer_backed() {
            Ok(contract) => contract,
            Err(err) => return self.fail_mint(operation, err),
        };

        info!(operation, "requesting mint signature");
        let pending = match contract.mint().await {
            Ok(pending) => pending,
            Err(err) => return self.fail_mint(operation, err),
        };

        let tx_hash = pending.hash().clone();
        self.with_state(|state| state.mint.transaction_hash = Some(tx_hash.clone()));
        self.advance_mint(MintStatus::Mining);
        self.post(StatusOrigin::Mint, status::mining());

        info!(operation, %tx_hash, "waiting for inclusion");
        if let Err(err) = pending.wait().await {
            return self.fail_mint(operation, err);
        }

        let link = links::explorer_tx_url(&self.config, &tx_hash);
        self.advance_mint(MintStatus::Confirmed);
        self.with_state(|state| {
            state.transaction_link = Some(link.clone());
            state.busy = false;
        });
        self.post(StatusOrigin::Mint, status::mined(&link));

        self.read_mint_count().await;
        MintOutcome::Confirmed(tx_hash)
    }

    /// Apply minted notifications delivered since the last call.
    pub fn apply_pending_events(&self) -> usize {
        let events = self.events_rx.borrow_mut().drain();
        for event in &events {
            debug!(from = %event.from, token = %event.token_id, "minted event");
            let link = links::marketplace_token_url(&self.config, event.token_id);
            self.post(StatusOrigin::MintedEvent, status::minted_event(&link));
        }
        events.len()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let capacity = self.config.capacity;
        self.with_state(|state| {
            let sold_out = state.minted_count >= capacity;
            SessionSnapshot {
                connection: state.connection,
                account: state.account.clone(),
                chain_id: state.chain_id.clone(),
                minted_count: state.minted_count,
                capacity,
                busy: state.busy,
                status_message: state.status.message().to_owned(),
                transaction_link: state.transaction_link.clone(),
                mint_status: state.mint.status,
                sold_out,
                can_mint: state.connection == ConnectionStatus::Connected
                    && !state.busy
                    && !state.mint.status.is_in_flight()
                    && !sold_out,
            }
        })
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.with_state(|state| state.connection)
    }

    pub fn account(&self) -> Option<WalletAddress> {
        self.with_state(|state| state.account.clone())
    }

    pub fn minted_count(&self) -> u64 {
        self.with_state(|state| state.minted_count)
    }

    pub fn is_busy(&self) -> bool {
        self.with_state(|state| state.busy)
    }

    pub fn status_message(&self) -> String {
        self.with_state(|state| state.status.message().to_owned())
    }

    pub fn status_revision(&self) -> u64 {
        self.with_state(|state| state.status.revision())
    }

    pub fn mint_operation(&self) -> MintOperation {
        self.with_state(|state| state.mint.clone())
    }

    // ── internals ──

    fn with_state<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    fn post(&self, origin: StatusOrigin, message: String) {
        self.with_state(|state| state.status.post(origin, message));
    }

    /// The busy flag is claimed before the operation starts waiting, so it
    /// covers the network check as well as both waiting stages.
    fn mint_in_flight(&self) -> bool {
        self.with_state(|state| state.busy || state.mint.status.is_in_flight())
    }

    fn set_busy(&self, busy: bool) {
        self.with_state(|state| state.busy = busy);
    }

    fn mark_connected(&self, account: WalletAddress) {
        self.with_state(|state| {
            state.account = Some(account);
            state.connection = ConnectionStatus::Connected;
        });
    }

    /// Returns `false` on a confirmed mismatch; read failures count as a match
    /// since the mismatch is advisory unless configured otherwise.
    async fn check_network(&self, provider: &dyn WalletProvider) -> bool {
        let chain_id = match provider.chain_id().await {
            Ok(chain_id) => chain_id,
            Err(err) => {
                warn!("failed to read chain id: {}", err);
                return !self.config.require_network_match;
            }
        };
        debug!(%chain_id, "wallet chain");
        self.with_state(|state| state.chain_id = Some(chain_id.clone()));

        let required = self.config.required_chain();
        if chain_id.matches(&required) {
            return true;
        }

        warn!(%chain_id, %required, "wallet is on the wrong network");
        self.post(
            StatusOrigin::Network,
            status::wrong_network(&self.config.network_name, &required, &chain_id),
        );
        false
    }

    fn subscribe_minted(&self) {
        let result = self
            .factory
            .signer_backed()
            .and_then(|contract| contract.subscribe_minted(self.events_tx.clone()));
        match result {
            Ok(()) => info!("minted event listener registered"),
            Err(err) => warn!("failed to register minted event listener: {}", err),
        }
    }

    fn record_count(&self, count: u64) -> u64 {
        self.with_state(|state| {
            if count < state.minted_count {
                warn!(
                    current = state.minted_count,
                    reported = count,
                    "ignoring stale mint count"
                );
            } else {
                state.minted_count = count;
            }
            state.minted_count
        })
    }

    fn begin_operation(&self) -> u64 {
        let id = self.with_state(|state| {
            state.next_operation_id += 1;
            state.mint = MintOperation {
                id: state.next_operation_id,
                ..MintOperation::default()
            };
            state.mint.id
        });
        self.advance_mint(MintStatus::AwaitingSignature);
        id
    }

    fn advance_mint(&self, next: MintStatus) {
        self.with_state(|state| {
            let current = state.mint.status;
            if current.can_advance_to(next) {
                state.mint.status = next;
                info!(operation = state.mint.id, "mint {:?} -> {:?}", current, next);
            } else {
                warn!(operation = state.mint.id, "refusing mint transition {:?} -> {:?}", current, next);
            }
        });
    }

    fn fail_mint(&self, operation: u64, err: ChainError) -> MintOutcome {
        if err.is_user_rejection() {
            info!(operation, "mint declined in wallet");
        } else {
            warn!(operation, "mint failed: {}", err);
        }
        self.advance_mint(MintStatus::Failed);
        self.set_busy(false);
        MintOutcome::Failed(err)
    }
}
