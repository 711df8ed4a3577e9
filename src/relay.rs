use crate::bigmarker_client::{
    BigMarkerClient, BigMarkerError, ChannelSubscriptionRequest, ConferenceRegistrationRequest,
};
use crate::domain::{
    ActionConfig, Delivery, RelayOutcome, Submission, Target, UserContext,
    CONFERENCE_URL_FIELD, SUBSCRIBER_ID_FIELD,
};

/// Forwards a submission to BigMarker: a channel subscription when the form
/// names a channel, a conference registration when the submission names a
/// webinar. Failures end up in the outcome and never abort processing.
#[tracing::instrument(
    name = "Relaying a form submission to BigMarker",
    skip(client, submission, config, user),
    fields(user_id = tracing::field::Empty)
)]
pub async fn process(
    client: &BigMarkerClient,
    submission: &Submission,
    config: &ActionConfig,
    user: &UserContext,
) -> RelayOutcome {
    let mut outcome = RelayOutcome::default();
    if let Some(user_id) = user.id() {
        tracing::Span::current().record("user_id", &tracing::field::display(user_id));
    }

    let api_key = match config.api_key() {
        Some(api_key) => api_key,
        None => {
            tracing::debug!("No BigMarker API key configured for the form, skipping");
            return outcome;
        }
    };
    let identity = match submission.identity() {
        Some(identity) => identity,
        None => {
            tracing::debug!("Submission lacks an email, first name or last name, skipping");
            return outcome;
        }
    };

    if let Some(channel) = config.channel() {
        let request = ChannelSubscriptionRequest {
            email: identity.email.as_ref(),
            first_name: identity.first_name.as_ref(),
            last_name: identity.last_name.as_ref(),
        };
        let result = client.add_subscriber(api_key, channel, &request).await;
        let delivery = settle(Target::Channel, result, user, SUBSCRIBER_ID_FIELD).await;
        outcome.record(Target::Channel, delivery);
    }

    if let Some(webinar) = submission.webinar() {
        let request = ConferenceRegistrationRequest {
            id: webinar,
            email: identity.email.as_ref(),
            first_name: identity.first_name.as_ref(),
            last_name: identity.last_name.as_ref(),
            utm_bmcr_source: submission.utm_source(),
            custom_user_id: user.id(),
        };
        let result = client.register_for_conference(api_key, &request).await;
        let delivery = settle(Target::Conference, result, user, CONFERENCE_URL_FIELD).await;
        outcome.record(Target::Conference, delivery);
    }

    outcome
}

async fn settle(
    target: Target,
    result: Result<Option<String>, BigMarkerError>,
    user: &UserContext,
    profile_field: &str,
) -> Delivery {
    let reference = match result {
        Ok(reference) => reference,
        Err(e) => {
            tracing::warn!(
                relay.target = %target,
                error.message = %e,
                error.cause_chain = ?e,
                "BigMarker did not accept the submission"
            );
            return Delivery::Failed {
                error: e.to_string(),
            };
        }
    };

    let stored = match (&reference, user.is_authenticated()) {
        (Some(value), true) => match user.set_field(profile_field, value).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    relay.target = %target,
                    error.cause_chain = ?e,
                    "Failed to store the BigMarker reference on the user profile"
                );
                false
            }
        },
        _ => false,
    };
    Delivery::Delivered { reference, stored }
}
