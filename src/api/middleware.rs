//! # Error chain logging
//!
//! Walks `source()` so the log shows the whole chain (for instance
//! `AppError::Backend` → `SubmissionError::Connectivity`), not just the top.

use std::error::Error as StdError;

fn collect_chain<E>(error: &E) -> Vec<String>
where
    E: StdError + 'static,
{
    let mut error_chain = Vec::new();
    let mut current_error: Option<&dyn StdError> = Some(error);

    while let Some(err) = current_error {
        error_chain.push(err.to_string());
        current_error = err.source();
    }
    error_chain
}

/// Logs the full error chain under a context label
pub fn log_error_chain<E>(error: &E, context: &str)
where
    E: StdError + 'static,
{
    let error_chain = collect_chain(error);
    tracing::error!(
        context = %context,
        error_chain = ?error_chain,
        "Error with full chain"
    );
}

/// Extension trait for `Result`s that logs the error chain on the way out
///
/// # Example
///
/// ```ignore
/// use crate::api::middleware::ErrorLogExt;
///
/// state.reservations
///     .table_availability(timeslot)
///     .await
///     .log_error_context("checking table availability")?;
/// ```
pub trait ErrorLogExt<T, E> {
    fn log_error_context(self, context: &str) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, context);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AppError;
    use crate::reservation::SubmissionError;

    #[test]
    fn chain_includes_the_wrapped_backend_error() {
        let err = AppError::backend(
            "table_availability",
            SubmissionError::Connectivity("connection refused".into()),
        );
        let chain = collect_chain(&err);
        assert_eq!(chain.len(), 2);
        assert!(chain[0].contains("table_availability"));
        assert_eq!(chain[1], SubmissionError::Connectivity(String::new()).to_string());
    }

    #[test]
    fn ok_results_pass_through_untouched() {
        let ok: Result<u8, SubmissionError> = Ok(4);
        assert_eq!(ok.log_error_context("reading party size"), Ok(4));
    }
}
