//! Transaction pre-handle: concurrent validation and signature dispatch
//! ahead of consensus ordering.
//!
//! When a node receives a candidate transaction it runs one pre-handle pass
//! on a worker thread: decode the envelope, resolve the payer, let the
//! transaction-kind handler gather every key and hollow account whose
//! signature is required, dispatch one asynchronous verification per
//! distinct cryptographic leaf, and hand back a [`PreHandleResult`] without
//! waiting for any of them. The consensus handling stage later asks the
//! result whether full key expressions held.
//!
//! ```text
//! bytes ──decode──► PreHandleContext ──handlers──► required keys/accounts
//!                        │                                │
//!                        ▼                                ▼
//!                  payer lookup                 expand + dispatch futures
//!                                                         │
//!                                                         ▼
//!                                                  PreHandleResult
//! ```
//!
//! Failures are charged per the three-way fault split: decode failures to
//! the submitting node ([`PreHandleStatus::NodeDueDiligenceFailure`]),
//! validation failures to the payer ([`PreHandleStatus::PreHandleFailure`]),
//! and anything unexpected to nobody
//! ([`PreHandleStatus::UnknownFailure`]).

mod context;
mod handlers;
mod result;
mod workflow;

pub use context::PreHandleContext;
pub use handlers::{
    ContractUpdateHandler, CryptoDeleteHandler, CryptoTransferHandler, ScheduleCreateHandler,
    TokenMintHandler, TransactionDispatcher, TransactionHandler,
};
pub use result::{PreHandleResult, PreHandleStatus, VerificationResults};
pub use workflow::{PreHandleWorkflow, PreHandleWorkflowStats};
