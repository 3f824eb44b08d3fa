//! Single filter criterion on one column
//!
//! A `Condition` is a cheap, cloneable handle. It keeps the editor-canonical
//! operator and wire value; the rich control value is decoded on demand and
//! memoized per revision. Mutations return the events they caused and also
//! broadcast them to subscribers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;

use super::column::{Column, DataType};
use super::context::FilterContext;
use super::decoration::decorate;
use super::expression::WireValue;
use super::operators::{Operator, OperatorCategory};
use super::resolver::resolve_references;
use super::validation::{ValidationResult, has_errors};
use super::value::ControlValue;
use super::variants::{ConditionKind, merge_remembered_references};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How a condition came into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOrigin {
    /// Added by the user, not yet part of the dataset expression
    Fresh,
    /// Parsed from the dataset's live filter expression
    Hydrated,
}

/// Change observed on a condition
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionEvent {
    OperatorChanged { id: String, operator: Operator },
    ValueChanged { id: String, value: WireValue },
    LoadingChanged { id: String, loading: bool },
}

/// Operator family sharing a control value shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueFamily {
    Exact,
    Text,
    Range,
    Count,
}

impl ValueFamily {
    /// `None` for operators that take no value
    pub fn of(operator: Operator) -> Option<Self> {
        match operator.category() {
            OperatorCategory::Equality
            | OperatorCategory::Comparison
            | OperatorCategory::MultiValue => Some(Self::Exact),
            OperatorCategory::Pattern => Some(Self::Text),
            OperatorCategory::Range => Some(Self::Range),
            OperatorCategory::RelativeCount => Some(Self::Count),
            OperatorCategory::NullCheck
            | OperatorCategory::RelativeDate
            | OperatorCategory::Other => None,
        }
    }
}

#[derive(Debug)]
struct ConditionState {
    operator: Operator,
    /// Undecorated wire value
    wire: WireValue,
    resolving: bool,
    /// Bumped on every value write
    revision: u64,
    decoded: Option<(u64, ControlValue)>,
    /// Last control value per family, restored when switching back
    families: HashMap<ValueFamily, ControlValue>,
    /// Ids no lookup target could resolve
    unresolvable: HashSet<String>,
}

#[derive(Debug)]
struct ConditionInner {
    id: String,
    column: Arc<Column>,
    kind: ConditionKind,
    context: FilterContext,
    origin: ConditionOrigin,
    state: Mutex<ConditionState>,
    events: broadcast::Sender<ConditionEvent>,
}

#[derive(Debug, Clone)]
pub struct Condition {
    inner: Arc<ConditionInner>,
}

/// Editor-facing view of a condition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSnapshot {
    pub id: String,
    pub column: String,
    pub operator: Operator,
    pub operator_name: &'static str,
    pub data_type: Option<DataType>,
    pub value: ControlValue,
    pub wire_value: WireValue,
    pub validation: Vec<ValidationResult>,
    pub origin: ConditionOrigin,
    pub loading: bool,
}

impl Condition {
    /// Default condition added by the user: Equal with no value
    pub(crate) fn fresh(id: String, column: Arc<Column>, context: FilterContext) -> Self {
        Self::build(id, column, context, ConditionOrigin::Fresh, Operator::Equal, WireValue::Null)
    }

    /// Condition parsed from the dataset expression, already undecorated
    pub(crate) fn hydrated(
        id: String,
        column: Arc<Column>,
        context: FilterContext,
        operator: Operator,
        wire: WireValue,
    ) -> Self {
        Self::build(id, column, context, ConditionOrigin::Hydrated, operator, wire)
    }

    fn build(
        id: String,
        column: Arc<Column>,
        context: FilterContext,
        origin: ConditionOrigin,
        operator: Operator,
        wire: WireValue,
    ) -> Self {
        let kind = ConditionKind::for_data_type(column.data_type);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(ConditionInner {
                id,
                column,
                kind,
                context,
                origin,
                state: Mutex::new(ConditionState {
                    operator,
                    wire,
                    resolving: false,
                    revision: 0,
                    decoded: None,
                    families: HashMap::new(),
                    unresolvable: HashSet::new(),
                }),
                events,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn column(&self) -> &Column {
        &self.inner.column
    }

    pub fn kind(&self) -> ConditionKind {
        self.inner.kind
    }

    pub fn origin(&self) -> ConditionOrigin {
        self.inner.origin
    }

    pub fn is_hydrated(&self) -> bool {
        self.inner.origin == ConditionOrigin::Hydrated
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConditionEvent> {
        self.inner.events.subscribe()
    }

    /// Active operator; `decorate` gives the one sent to the query layer
    pub fn operator(&self, decorate: bool) -> Operator {
        if decorate {
            return self.decorated().0;
        }
        self.inner.state.lock().operator
    }

    /// Wire value; `decorate` gives the one sent to the query layer
    pub fn value(&self, decorate: bool) -> WireValue {
        if decorate {
            return self.decorated().1;
        }
        self.inner.state.lock().wire.clone()
    }

    /// Query-layer operator and value
    pub fn decorated(&self) -> (Operator, WireValue) {
        let state = self.inner.state.lock();
        decorate(
            self.inner.kind,
            state.operator,
            &state.wire,
            &self.inner.context.settings.wildcard,
        )
    }

    pub fn supported_operators(&self) -> &'static [Operator] {
        self.inner.kind.supported_operators()
    }

    /// Editor data type, `None` when the operator takes no value
    pub fn data_type(&self) -> Option<DataType> {
        let operator = self.inner.state.lock().operator;
        self.inner.kind.data_type(operator, &self.inner.column)
    }

    pub fn validation_result(&self) -> Vec<ValidationResult> {
        let state = self.inner.state.lock();
        self.inner
            .kind
            .validate(state.operator, &state.wire, &self.inner.column)
    }

    pub fn is_valid(&self) -> bool {
        !has_errors(&self.validation_result())
    }

    pub fn is_value_loading(&self) -> bool {
        self.inner.state.lock().resolving
    }

    /// Switch operator, re-deriving the value under the new operator's rules
    ///
    /// The current value is re-encoded; when that leaves nothing, the last
    /// value used with the new operator's family is restored.
    pub fn set_operator(&self, operator: Operator) -> Vec<ConditionEvent> {
        let events = {
            let mut state = self.inner.state.lock();
            if state.operator == operator {
                return Vec::new();
            }

            let current = self.decode_locked(&mut state);
            if let Some(family) = ValueFamily::of(state.operator)
                && !current.is_null()
            {
                state.families.insert(family, current.clone());
            }

            let column = &self.inner.column;
            let mut wire = self.inner.kind.encode(operator, &current, column);
            if wire.is_empty()
                && let Some(family) = ValueFamily::of(operator)
                && let Some(remembered) = state.families.get(&family)
            {
                tracing::trace!(id = %self.inner.id, ?family, "Restoring remembered value");
                wire = self.inner.kind.encode(operator, remembered, column);
            }

            tracing::trace!(
                id = %self.inner.id,
                from = %state.operator,
                to = %operator,
                "Operator changed"
            );
            state.operator = operator;
            self.store_locked(&mut state, wire);
            vec![
                ConditionEvent::OperatorChanged {
                    id: self.inner.id.clone(),
                    operator,
                },
                ConditionEvent::ValueChanged {
                    id: self.inner.id.clone(),
                    value: state.wire.clone(),
                },
            ]
        };
        self.publish(&events);
        events
    }

    /// Encode and store an editor value under the active operator
    pub fn set_value(&self, value: ControlValue) -> Vec<ConditionEvent> {
        let events = {
            let mut state = self.inner.state.lock();
            vec![self.apply_value_locked(&mut state, value)]
        };
        self.publish(&events);
        events
    }

    /// Decoded control value, without waiting for lookup resolution
    pub fn control_value(&self) -> ControlValue {
        let mut state = self.inner.state.lock();
        self.decode_locked(&mut state)
    }

    /// Decoded control value with lookup references resolved
    ///
    /// Bare ids are resolved concurrently against the column's lookup
    /// targets. While a resolution is in flight further calls return the
    /// current value without starting another. A resolution that finishes
    /// after the value was edited is discarded.
    pub async fn load_control_value(&self) -> ControlValue {
        let Some(metadata) = self.inner.context.metadata.clone() else {
            return self.control_value();
        };

        let (revision, pending) = {
            let mut state = self.inner.state.lock();
            let value = self.decode_locked(&mut state);
            if state.resolving || self.inner.kind != ConditionKind::Lookup {
                return value;
            }
            let pending: Vec<String> = value
                .unresolved_references()
                .into_iter()
                .map(|r| r.id.clone())
                .filter(|id| !state.unresolvable.contains(id))
                .collect();
            if pending.is_empty() {
                return value;
            }
            state.resolving = true;
            (state.revision, pending)
        };
        self.publish(&[ConditionEvent::LoadingChanged {
            id: self.inner.id.clone(),
            loading: true,
        }]);

        tracing::debug!(
            id = %self.inner.id,
            column = %self.inner.column.name,
            ids = pending.len(),
            "Resolving lookup references"
        );
        let resolved =
            resolve_references(metadata.as_ref(), &self.inner.column.metadata.targets, &pending)
                .await;

        let events = {
            let mut state = self.inner.state.lock();
            state.resolving = false;
            for id in &pending {
                if !resolved.contains_key(id) {
                    state.unresolvable.insert(id.clone());
                }
            }

            let mut events = Vec::new();
            if state.revision == revision {
                let value = match self.decode_locked(&mut state) {
                    ControlValue::References(refs) => ControlValue::References(
                        refs.into_iter()
                            .map(|r| resolved.get(&r.id).cloned().unwrap_or(r))
                            .collect(),
                    ),
                    other => other,
                };
                events.push(self.remember_resolved_locked(&mut state, value));
            } else {
                tracing::debug!(
                    id = %self.inner.id,
                    started = revision,
                    current = state.revision,
                    "Discarding stale lookup resolution"
                );
            }
            events.push(ConditionEvent::LoadingChanged {
                id: self.inner.id.clone(),
                loading: false,
            });
            events
        };
        self.publish(&events);
        self.control_value()
    }

    pub fn snapshot(&self) -> ConditionSnapshot {
        let mut state = self.inner.state.lock();
        let value = self.decode_locked(&mut state);
        let operator = state.operator;
        let column = &self.inner.column;
        ConditionSnapshot {
            id: self.inner.id.clone(),
            column: column.name.clone(),
            operator,
            operator_name: operator.as_str(),
            data_type: self.inner.kind.data_type(operator, column),
            value,
            wire_value: state.wire.clone(),
            validation: self.inner.kind.validate(operator, &state.wire, column),
            origin: self.inner.origin,
            loading: state.resolving,
        }
    }

    fn apply_value_locked(
        &self,
        state: &mut ConditionState,
        value: ControlValue,
    ) -> ConditionEvent {
        let wire = self
            .inner
            .kind
            .encode(state.operator, &value, &self.inner.column);
        if let Some(family) = ValueFamily::of(state.operator)
            && !value.is_null()
        {
            state.families.insert(family, value);
        }
        self.store_locked(state, wire);
        ConditionEvent::ValueChanged {
            id: self.inner.id.clone(),
            value: state.wire.clone(),
        }
    }

    /// Keep resolved names without re-encoding: the wire ids stay as hydrated
    fn remember_resolved_locked(
        &self,
        state: &mut ConditionState,
        value: ControlValue,
    ) -> ConditionEvent {
        if let Some(family) = ValueFamily::of(state.operator) {
            state.families.insert(family, value);
        }
        state.revision += 1;
        state.decoded = None;
        ConditionEvent::ValueChanged {
            id: self.inner.id.clone(),
            value: state.wire.clone(),
        }
    }

    fn store_locked(&self, state: &mut ConditionState, wire: WireValue) {
        state.wire = wire;
        state.revision += 1;
        state.decoded = None;
    }

    fn decode_locked(&self, state: &mut ConditionState) -> ControlValue {
        if let Some((revision, value)) = &state.decoded
            && *revision == state.revision
        {
            return value.clone();
        }
        let decoded = self
            .inner
            .kind
            .decode(state.operator, &state.wire, &self.inner.column);
        let decoded = merge_remembered_references(decoded, state.families.get(&ValueFamily::Exact));
        state.decoded = Some((state.revision, decoded.clone()));
        decoded
    }

    fn publish(&self, events: &[ConditionEvent]) {
        for event in events {
            // No subscribers is fine
            let _ = self.inner.events.send(event.clone());
        }
    }
}
