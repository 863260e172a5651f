use super::{FormPhase, RosterForm, VALIDATION_MESSAGE};
use crate::client::ScheduleClient;
use tracing::{info, warn};

pub(super) async fn submit<C>(form: &mut RosterForm, client: &C)
where
    C: ScheduleClient + ?Sized,
{
    if matches!(form.phase, FormPhase::Submitting | FormPhase::DisplayingResult(_)) {
        return;
    }
    let Some(request) = form.build_request() else {
        form.phase = FormPhase::ShowingError(VALIDATION_MESSAGE.to_string());
        return;
    };

    form.phase = FormPhase::Submitting;
    form.phase = match client.submit(&request).await {
        Ok(response) => {
            info!(days = response.len(), "schedule received");
            FormPhase::DisplayingResult(response)
        }
        Err(e) => {
            warn!(error = %e, "schedule submission failed");
            FormPhase::ShowingError(e.user_message())
        }
    };
}
