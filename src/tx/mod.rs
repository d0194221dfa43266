//! Transaction submission with confirmation tracking and user notifications

mod submitter;

pub use submitter::{
    SkipReason, SubmissionOutcome, TransactionSubmitter, ACCOUNT_NOT_FOUND_MESSAGE,
    CONFIRMED_MESSAGE, FAILED_MESSAGE, NOT_SUBMITTED_MESSAGE,
};
