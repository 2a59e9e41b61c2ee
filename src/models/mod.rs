pub mod user;
pub mod alert;
pub mod breach;
pub mod push_subscription;
pub mod notification;

pub use user::{CurrentUser, User};
pub use alert::Alert;
pub use breach::{BreachEvent, BreachKind};
pub use push_subscription::{PushSubscription, SubscriptionKeys};
pub use notification::{
    ChannelResult, MessageRequest, PushPayload, PushSendRequest, TriggerResponse, TriggerResults,
    VapidKeyResponse,
};
