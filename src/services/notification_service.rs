use mongodb::bson::oid::ObjectId;

use crate::{
    models::{ChannelResult, CurrentUser, PushPayload, TriggerResults},
    AppState,
};

#[derive(Debug, Default)]
pub struct PushReport {
    pub attempted: usize,
    pub sent: usize,
    pub errors: Vec<String>,
}

/// Delivers `payload` to every subscription of the user.
///
/// Subscriptions the push service reports as gone (404/410) are deleted.
/// Callers check that push is configured and that the user has subscriptions.
pub async fn deliver_push(state: &AppState, user_id: ObjectId, payload: &PushPayload) -> Result<PushReport, String> {
    let Some(push) = state.push.as_ref() else {
        return Err("VAPID keys not configured".to_string());
    };

    let subs = state
        .subscriptions
        .list_for_user(user_id)
        .await
        .map_err(|e| e.to_string())?;

    let mut report = PushReport {
        attempted: subs.len(),
        ..PushReport::default()
    };

    for sub in subs {
        match push.send(&sub, payload).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                if e.is_gone() {
                    tracing::info!("[push] removing expired subscription {}", sub.endpoint);
                    if let Err(del) = state.subscriptions.delete(sub.id).await {
                        tracing::warn!("[push] could not remove subscription: {}", del);
                    }
                }
                report.errors.push(e.to_string());
            }
        }
    }

    Ok(report)
}

/// Fans `message` out over SMS and push, reporting each channel separately.
pub async fn trigger_alert(state: &AppState, user: &CurrentUser, message: &str) -> TriggerResults {
    let sms = trigger_sms(state, user, message).await;
    let push = trigger_push(state, user, message).await;

    TriggerResults { sms, push }
}

async fn trigger_sms(state: &AppState, user: &CurrentUser, message: &str) -> ChannelResult {
    let (Some(sms), Some(phone)) = (state.sms.as_ref(), user.phone_number.as_deref()) else {
        return ChannelResult::failed("Not configured or no phone number");
    };

    match sms.send_sms(phone, message).await {
        Ok(_) => ChannelResult {
            sent: true,
            error: None,
        },
        Err(e) => {
            tracing::warn!("[trigger] sms failed for {}: {}", user.email, e);
            ChannelResult::failed(e.to_string())
        }
    }
}

async fn trigger_push(state: &AppState, user: &CurrentUser, message: &str) -> ChannelResult {
    if state.push.is_none() {
        return ChannelResult::failed("VAPID not configured");
    }

    let payload = PushPayload {
        title: crate::models::notification::default_push_title(),
        body: message.to_string(),
        url: crate::models::notification::default_push_url(),
    };

    match deliver_push(state, user.id, &payload).await {
        Ok(report) if report.attempted == 0 => ChannelResult::failed("No subscriptions"),
        Ok(report) => ChannelResult {
            sent: report.sent > 0,
            error: report.errors.last().cloned(),
        },
        Err(e) => ChannelResult::failed(e),
    }
}
