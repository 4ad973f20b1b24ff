//! Change-feed port: filtered row-mutation subscriptions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use medhub_core::events::{ChangeEvent, EntityType};
use medhub_core::result::AppResult;
use medhub_core::types::SubscriptionId;

use crate::rules::Scope;
use crate::subject::SubjectKey;

/// Server-side filter of a change subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeFilter {
    /// Table to watch.
    pub entity: EntityType,
    /// Column of the new row compared against `value`; `None` matches every row.
    pub column: Option<String>,
    /// Expected value of `column`.
    pub value: Option<String>,
}

impl ChangeFilter {
    /// Every change on a table.
    pub fn all(entity: EntityType) -> Self {
        Self {
            entity,
            column: None,
            value: None,
        }
    }

    /// Changes whose new row has `column == value`.
    pub fn eq(entity: EntityType, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            entity,
            column: Some(column.into()),
            value: Some(value.into()),
        }
    }

    /// The filter a subject needs for one of its role's scopes.
    pub fn for_scope(scope: &Scope, subject: &SubjectKey) -> Self {
        match scope.owner_column {
            Some(column) => Self::eq(scope.entity, column, subject.subject_id.to_string()),
            None => Self::all(scope.entity),
        }
    }

    /// Whether a change passes the filter.
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if event.entity != self.entity {
            return false;
        }
        match (&self.column, &self.value) {
            (Some(column), Some(value)) => event.new_column(column) == Some(value.as_str()),
            (Some(column), None) => event.new.get(column).is_none_or(|v| v.is_null()),
            (None, _) => true,
        }
    }
}

/// An open subscription: its id and the stream of matching changes.
///
/// The receiver yields `None` once the channel has been dropped by the
/// remote side; the listener then resubscribes.
#[derive(Debug)]
pub struct ChangeSubscription {
    /// Identifier used to unsubscribe.
    pub id: SubscriptionId,
    /// Matching changes, in delivery order.
    pub receiver: mpsc::Receiver<ChangeEvent>,
}

/// Real-time change channel of the record store.
#[async_trait]
pub trait ChangeFeed: Send + Sync + std::fmt::Debug + 'static {
    /// Open a filtered subscription.
    async fn subscribe(&self, filter: ChangeFilter) -> AppResult<ChangeSubscription>;

    /// Close a subscription. Unknown ids are ignored.
    async fn unsubscribe(&self, id: SubscriptionId);
}
