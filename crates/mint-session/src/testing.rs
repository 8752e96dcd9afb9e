//! In-memory collaborators for controller tests.

use async_trait::async_trait;
use futures::channel::oneshot;
use mint_chain_client::{
    ChainError, ContractFactory, MintContract, MintCountReader, MintedEventSink, PendingTransaction,
    ProviderLookup, WalletProvider,
};
use mint_types::{ChainId, MintedEvent, TokenId, TxHash, WalletAddress};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const ACCOUNT: &str = "0xAbC0000000000000000000000000000000000001";

pub struct FakeWallet {
    pub authorized: RefCell<Vec<WalletAddress>>,
    pub on_request: RefCell<Result<Vec<WalletAddress>, ChainError>>,
    pub chain: RefCell<ChainId>,
    /// When set, `accounts()` fails with this error.
    pub accounts_error: RefCell<Option<ChainError>>,
    /// When set, `chain_id()` fails with this error.
    pub chain_error: RefCell<Option<ChainError>>,
    pub requests: Cell<usize>,
}

impl FakeWallet {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            authorized: RefCell::new(Vec::new()),
            on_request: RefCell::new(Ok(vec![WalletAddress(ACCOUNT.to_owned())])),
            chain: RefCell::new(ChainId("0x4".to_owned())),
            accounts_error: RefCell::new(None),
            chain_error: RefCell::new(None),
            requests: Cell::new(0),
        })
    }
}

#[async_trait(?Send)]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        self.requests.set(self.requests.get() + 1);
        self.on_request.borrow().clone()
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        match self.accounts_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(self.authorized.borrow().clone()),
        }
    }

    async fn chain_id(&self) -> Result<ChainId, ChainError> {
        match self.chain_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(self.chain.borrow().clone()),
        }
    }
}

#[derive(Default, Clone)]
pub struct FakeLookup {
    pub wallet: Rc<RefCell<Option<Rc<FakeWallet>>>>,
}

impl FakeLookup {
    pub fn with(wallet: Rc<FakeWallet>) -> Self {
        let lookup = Self::default();
        lookup.inject(wallet);
        lookup
    }

    pub fn inject(&self, wallet: Rc<FakeWallet>) {
        *self.wallet.borrow_mut() = Some(wallet);
    }
}

impl ProviderLookup for FakeLookup {
    fn provider(&self) -> Option<Rc<dyn WalletProvider>> {
        self.wallet
            .borrow()
            .clone()
            .map(|wallet| wallet as Rc<dyn WalletProvider>)
    }
}

pub enum MintPlan {
    Include(TxHash),
    Reject,
    DropAfterSubmit(TxHash, ChainError),
}

/// Shared on-chain state behind every client the factory builds.
pub struct FakeChain {
    pub count: Cell<u64>,
    pub plan: RefCell<MintPlan>,
    pub signature_gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub inclusion_gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub sinks: RefCell<Vec<MintedEventSink>>,
    /// When set, every counter read through either client fails with this error.
    pub read_error: RefCell<Option<ChainError>>,
    pub mint_calls: Cell<usize>,
    pub signer_reads: Cell<usize>,
    pub read_only_reads: Cell<usize>,
}

impl FakeChain {
    pub fn new(count: u64) -> Rc<Self> {
        Rc::new(Self {
            count: Cell::new(count),
            plan: RefCell::new(MintPlan::Include(TxHash("0xdead".to_owned()))),
            signature_gate: RefCell::new(None),
            inclusion_gate: RefCell::new(None),
            sinks: RefCell::new(Vec::new()),
            read_error: RefCell::new(None),
            mint_calls: Cell::new(0),
            signer_reads: Cell::new(0),
            read_only_reads: Cell::new(0),
        })
    }

    /// Hold `mint()` open until the returned sender fires.
    pub fn gate_signature(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.signature_gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn gate_inclusion(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.inclusion_gate.borrow_mut() = Some(rx);
        tx
    }

    fn read_count(&self) -> Result<u64, ChainError> {
        match self.read_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(self.count.get()),
        }
    }

    pub fn emit_minted(&self, from: &str, token: u64) {
        for sink in self.sinks.borrow().iter() {
            sink.push(MintedEvent {
                from: WalletAddress(from.to_owned()),
                token_id: TokenId(token),
            });
        }
    }
}

struct FakeContract(Rc<FakeChain>);

struct FakePending {
    hash: TxHash,
    outcome: Result<(), ChainError>,
    chain: Rc<FakeChain>,
}

#[async_trait(?Send)]
impl PendingTransaction for FakePending {
    fn hash(&self) -> &TxHash {
        &self.hash
    }

    async fn wait(&self) -> Result<(), ChainError> {
        let gate = self.chain.inclusion_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.outcome.is_ok() {
            self.chain.count.set(self.chain.count.get() + 1);
        }
        self.outcome.clone()
    }
}

#[async_trait(?Send)]
impl MintContract for FakeContract {
    async fn total_minted_count(&self) -> Result<u64, ChainError> {
        self.0.signer_reads.set(self.0.signer_reads.get() + 1);
        self.0.read_count()
    }

    async fn mint(&self) -> Result<Box<dyn PendingTransaction>, ChainError> {
        self.0.mint_calls.set(self.0.mint_calls.get() + 1);
        let gate = self.0.signature_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let (hash, outcome) = match &*self.0.plan.borrow() {
            MintPlan::Reject => return Err(ChainError::UserRejected),
            MintPlan::Include(hash) => (hash.clone(), Ok(())),
            MintPlan::DropAfterSubmit(hash, err) => (hash.clone(), Err(err.clone())),
        };
        Ok(Box::new(FakePending {
            hash,
            outcome,
            chain: self.0.clone(),
        }))
    }

    fn subscribe_minted(&self, sink: MintedEventSink) -> Result<(), ChainError> {
        self.0.sinks.borrow_mut().push(sink);
        Ok(())
    }
}

struct FakeReadOnly(Rc<FakeChain>);

#[async_trait(?Send)]
impl MintCountReader for FakeReadOnly {
    async fn total_minted_count(&self) -> Result<u64, ChainError> {
        self.0.read_only_reads.set(self.0.read_only_reads.get() + 1);
        self.0.read_count()
    }
}

pub struct FakeFactory {
    pub chain: Rc<FakeChain>,
    pub read_only: bool,
}

impl ContractFactory for FakeFactory {
    fn signer_backed(&self) -> Result<Rc<dyn MintContract>, ChainError> {
        Ok(Rc::new(FakeContract(self.chain.clone())))
    }

    fn read_only(&self) -> Option<Rc<dyn MintCountReader>> {
        self.read_only
            .then(|| Rc::new(FakeReadOnly(self.chain.clone())) as Rc<dyn MintCountReader>)
    }
}
