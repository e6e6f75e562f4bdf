use super::ListEngine;
use crate::error::EngineError;
use crate::logic::CheckoutPayload;
use crate::sources::{CheckoutCollaborator, CheckoutRedirect};
use crate::state::{ItemId, ListItem};

/// What: Validate the selection and submit it to the checkout collaborator.
///
/// Inputs:
/// - `engine`: Engine whose snapshot is paid.
/// - `collaborator`: Remote checkout mutation.
///
/// Output:
/// - Redirect returned by the collaborator.
///
/// # Errors
/// - `EngineError::Validation` before any remote call; engine state is untouched.
/// - `EngineError::Remote` with the collaborator's error unchanged. No retry.
pub async fn submit_checkout<T, C>(
    engine: &ListEngine<T>,
    collaborator: &C,
) -> Result<CheckoutRedirect, EngineError>
where
    T: ListItem,
    C: CheckoutCollaborator + ?Sized,
{
    let payload = engine.build_checkout()?;
    submit_payload(payload, collaborator).await
}

/// What: Pay the full open balance of one loaded row (the per-row "Pay" action).
///
/// # Errors
/// - Same as [`submit_checkout`], plus `UnknownItem` when `id` is not loaded.
pub async fn submit_single<T, C>(
    engine: &ListEngine<T>,
    id: &ItemId,
    collaborator: &C,
) -> Result<CheckoutRedirect, EngineError>
where
    T: ListItem,
    C: CheckoutCollaborator + ?Sized,
{
    let payload = engine.build_single_checkout(id)?;
    submit_payload(payload, collaborator).await
}

/// Hand a validated payload to the collaborator and log the outcome.
async fn submit_payload<C>(
    payload: CheckoutPayload,
    collaborator: &C,
) -> Result<CheckoutRedirect, EngineError>
where
    C: CheckoutCollaborator + ?Sized,
{
    let lines = payload.line_items.len();
    match collaborator.submit(payload).await {
        Ok(redirect) => {
            tracing::info!(lines, "checkout session created");
            Ok(redirect)
        }
        Err(e) => {
            tracing::warn!(error = %e, lines, "checkout submission failed");
            Err(EngineError::Remote(e))
        }
    }
}
