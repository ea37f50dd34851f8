//! State change context behaviour against the in-memory data access.

use std::sync::Arc;

use mes_core::model::data_access::{ERROR_MISSING, ERROR_UNKNOWN_FIELD};
use mes_core::model::{
    DataAccess, DataDefinition, Entity, EntityRef, FieldDefinition, FieldType, FieldValue,
    MemoryDataAccess, MemorySchemaProvider, ScalarType,
};
use mes_states::{
    MemoryMessageService, MessageService, StateChangeContext, StateChangeEntityDescriber,
    StateChangeError, StateChangeStatus, StateEnum, StateMessageType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderState {
    Pending,
    Accepted,
    InProgress,
    Completed,
}

impl StateEnum for OrderState {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "01pending",
            Self::Accepted => "02accepted",
            Self::InProgress => "03inProgress",
            Self::Completed => "04completed",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        [Self::Pending, Self::Accepted, Self::InProgress, Self::Completed]
            .into_iter()
            .find(|state| state.as_str() == value)
    }
}

struct OrderStateChangeDescriber {
    data_definition: EntityRef,
    owner_data_definition: EntityRef,
}

impl OrderStateChangeDescriber {
    fn new() -> Self {
        Self {
            data_definition: state_change_ref(),
            owner_data_definition: order_ref(),
        }
    }
}

impl StateChangeEntityDescriber for OrderStateChangeDescriber {
    type State = OrderState;

    fn data_definition(&self) -> &EntityRef {
        &self.data_definition
    }

    fn owner_data_definition(&self) -> &EntityRef {
        &self.owner_data_definition
    }

    fn owner_field_name(&self) -> &str {
        "order"
    }
}

fn state_change_ref() -> EntityRef {
    EntityRef::new("orders", "orderStateChange")
}

fn order_ref() -> EntityRef {
    EntityRef::new("orders", "order")
}

fn message_ref() -> EntityRef {
    EntityRef::new("orders", "message")
}

fn schemas() -> MemorySchemaProvider {
    let string = || FieldType::Scalar(ScalarType::String);
    let schemas = MemorySchemaProvider::new();
    schemas.register(
        DataDefinition::new("orders", "orderStateChange")
            .with_field(FieldDefinition::new("status", string()).required())
            .with_field(FieldDefinition::new("phase", FieldType::Scalar(ScalarType::Integer)))
            .with_field(FieldDefinition::new("sourceState", string()))
            .with_field(FieldDefinition::new("targetState", string()))
            .with_field(FieldDefinition::new(
                "order",
                FieldType::BelongsTo { target: order_ref() },
            ))
            .with_field(FieldDefinition::new(
                "messages",
                FieldType::HasMany {
                    target: message_ref(),
                    join_field: "stateChange".to_string(),
                },
            )),
    );
    schemas.register(
        DataDefinition::new("orders", "order")
            .with_field(FieldDefinition::new("name", string()).required())
            .with_field(FieldDefinition::new("state", string())),
    );
    schemas.register(
        DataDefinition::new("orders", "message")
            .with_field(FieldDefinition::new("translationKey", string())),
    );
    schemas
}

struct Fixture {
    data_access: Arc<MemoryDataAccess>,
    messages: Arc<MemoryMessageService>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            data_access: Arc::new(MemoryDataAccess::new(Arc::new(schemas()))),
            messages: Arc::new(MemoryMessageService::new()),
        }
    }

    fn context(
        &self,
        state_change: Entity,
    ) -> Result<StateChangeContext<OrderStateChangeDescriber>, StateChangeError> {
        StateChangeContext::new(
            state_change,
            OrderStateChangeDescriber::new(),
            Arc::clone(&self.data_access) as Arc<dyn DataAccess>,
            Arc::clone(&self.messages) as Arc<dyn MessageService>,
        )
    }

    fn persisted(&self, id: i64) -> Entity {
        self.data_access
            .get(&state_change_ref(), id)
            .expect("get")
            .expect("persisted state change")
    }
}

fn new_state_change() -> Entity {
    Entity::new(state_change_ref())
        .with_field("status", StateChangeStatus::InProgress.as_str())
        .with_field("sourceState", OrderState::Pending.as_str())
        .with_field("targetState", OrderState::Accepted.as_str())
}

#[test]
fn test_valid_entity_is_persisted() {
    let fixture = Fixture::new();
    let context = fixture.context(new_state_change()).expect("context");

    let id = context.state_change_entity().id().expect("id assigned");
    assert_eq!(context.status().expect("status"), StateChangeStatus::InProgress);
    assert_eq!(fixture.persisted(id).string_field("status"), Some("01inProgress"));
    assert_eq!(fixture.data_access.save_attempts(&state_change_ref()), 1);
    assert!(fixture.messages.all().is_empty());
}

#[test]
fn test_invalid_entity_without_prior_state_is_refused() {
    let fixture = Fixture::new();
    let entity = Entity::new(state_change_ref()).with_field("sourceState", "01pending");

    let err = fixture.context(entity).err().expect("refused");
    assert!(matches!(err, StateChangeError::NoValidPriorState { id: None }), "{err:?}");
}

#[test]
fn test_invalid_entity_with_prior_state_is_marked_as_failure() {
    let fixture = Fixture::new();
    let saved = fixture
        .data_access
        .save(new_state_change())
        .expect("initial save");
    let id = saved.id().expect("id");

    let broken = saved.with_field("status", FieldValue::Null);
    let context = fixture.context(broken).expect("context");

    assert_eq!(context.state_change_entity().id(), Some(id));
    assert_eq!(context.status().expect("status"), StateChangeStatus::Failure);
    assert_eq!(fixture.persisted(id).string_field("status"), Some("04failure"));

    let messages = fixture.messages.messages(&context.message_context());
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, StateMessageType::ValidationError);
    assert_eq!(messages[0].field.as_deref(), Some("status"));
    assert_eq!(messages[0].translation_key, ERROR_MISSING);
}

#[test]
fn test_rejected_save_keeps_last_good_record() {
    let fixture = Fixture::new();
    let mut context = fixture.context(new_state_change()).expect("context");
    let id = context.state_change_entity().id().expect("id");

    context.set_field("priority", "high");
    context.save().expect("save");

    assert_eq!(context.status().expect("status"), StateChangeStatus::Failure);
    assert_eq!(fixture.persisted(id).string_field("status"), Some("01inProgress"));

    let messages = fixture.messages.all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].field, None);
    assert_eq!(messages[0].translation_key, ERROR_UNKNOWN_FIELD);
    assert_eq!(messages[0].translation_args, vec!["priority".to_string()]);
}

#[test]
fn test_phase_and_status_round_trip() {
    let fixture = Fixture::new();
    let mut context = fixture.context(new_state_change()).expect("context");
    assert_eq!(context.phase(), 0);

    context.set_phase(2);
    context.set_status(StateChangeStatus::Successful);
    context.save().expect("save");

    let id = context.state_change_entity().id().expect("id");
    let persisted = fixture.persisted(id);
    assert_eq!(persisted.integer_field("phase"), Some(2));
    assert_eq!(persisted.string_field("status"), Some("03successful"));
    assert_eq!(context.phase(), 2);
    assert_eq!(context.status().expect("status"), StateChangeStatus::Successful);
}

#[test]
fn test_phase_of_unexpected_type_reads_as_zero() {
    let fixture = Fixture::new();
    let mut context = fixture.context(new_state_change()).expect("context");

    context.set_field("phase", "two");
    assert_eq!(context.phase(), 0);
}

#[test]
fn test_state_enum_values() {
    let fixture = Fixture::new();
    let mut context = fixture.context(new_state_change()).expect("context");

    assert_eq!(context.state_enum_value("sourceState").expect("source"), OrderState::Pending);
    assert_eq!(context.state_enum_value("targetState").expect("target"), OrderState::Accepted);

    context.set_field("targetState", "99unknown");
    let err = context.state_enum_value("targetState").unwrap_err();
    assert!(
        matches!(&err, StateChangeError::UnknownState { field, value } if field == "targetState" && value == "99unknown"),
        "{err:?}"
    );
}

#[test]
fn test_valid_owner_is_saved_and_linked() {
    let fixture = Fixture::new();
    let mut context = fixture.context(new_state_change()).expect("context");

    let order = Entity::new(order_ref()).with_field("name", "Order 1");
    context.set_owner(order).expect("set owner");

    let owner = context.owner().expect("owner linked");
    assert!(owner.id().is_some());
    assert_eq!(owner.string_field("name"), Some("Order 1"));
    assert_eq!(fixture.data_access.row_count(&order_ref()), 1);

    let id = context.state_change_entity().id().expect("id");
    assert!(fixture.persisted(id).belongs_to_field("order").is_some());
    assert_eq!(fixture.data_access.save_attempts(&state_change_ref()), 2);
}

#[test]
fn test_failed_owner_makes_later_assignments_no_ops() {
    let fixture = Fixture::new();
    let mut context = fixture.context(new_state_change()).expect("context");

    // Missing the required name.
    context
        .set_owner(Entity::new(order_ref()).with_field("state", "01pending"))
        .expect("first owner");
    assert!(context.owner().is_none());
    assert_eq!(context.status().expect("status"), StateChangeStatus::Failure);
    assert_eq!(fixture.data_access.save_attempts(&order_ref()), 1);
    assert_eq!(fixture.data_access.save_attempts(&state_change_ref()), 2);

    context
        .set_owner(Entity::new(order_ref()).with_field("name", "Order 2"))
        .expect("second owner");
    assert!(context.owner().is_none());
    assert_eq!(fixture.data_access.save_attempts(&order_ref()), 1);
    assert_eq!(fixture.data_access.save_attempts(&state_change_ref()), 2);
    assert_eq!(fixture.data_access.row_count(&order_ref()), 0);

    let messages = fixture.messages.all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].field.as_deref(), Some("name"));
}

#[test]
fn test_owner_with_errors_is_not_saved() {
    let fixture = Fixture::new();
    let mut context = fixture.context(new_state_change()).expect("context");

    let mut order = Entity::new(order_ref()).with_field("name", "Order 3");
    order.add_global_error("orders.order.error.locked", ["Order 3"]);
    context.set_owner(order).expect("set owner");

    assert_eq!(fixture.data_access.save_attempts(&order_ref()), 0);
    assert!(context.owner().is_none());
    let messages = fixture.messages.all();
    assert_eq!(messages[0].translation_key, "orders.order.error.locked");
    assert_eq!(messages[0].translation_args, vec!["Order 3".to_string()]);
}

#[test]
fn test_messages_carry_context_and_field() {
    let fixture = Fixture::new();
    let context = fixture.context(new_state_change()).expect("context");

    context.add_message("orders.started", StateMessageType::Info, &[]);
    context.add_field_message("orders.dateTooEarly", StateMessageType::Failure, "dateFrom", &["2026-10-19"]);
    context.add_validation_error("orders.invalid", &[]);
    context.add_field_validation_error("name", "orders.nameTaken", &["Order 1"]);

    let messages = fixture.messages.messages(&context.message_context());
    let summary: Vec<_> = messages
        .iter()
        .map(|m| (m.message_type, m.field.as_deref(), m.translation_key.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (StateMessageType::Info, None, "orders.started"),
            (StateMessageType::Failure, Some("dateFrom"), "orders.dateTooEarly"),
            (StateMessageType::ValidationError, None, "orders.invalid"),
            (StateMessageType::ValidationError, Some("name"), "orders.nameTaken"),
        ]
    );
    assert_eq!(
        context.message_context().state_change_id,
        context.state_change_entity().id()
    );
}

#[test]
fn test_all_messages_reads_message_records() {
    let fixture = Fixture::new();
    let mut context = fixture.context(new_state_change()).expect("context");
    assert!(context.all_messages().is_empty());

    context.set_field(
        "messages",
        FieldValue::HasMany(vec![
            Entity::new(message_ref()).with_field("translationKey", "orders.started")
        ]),
    );
    assert_eq!(context.all_messages().len(), 1);
}

#[test]
fn test_describer_fields_are_checked_against_schema() {
    let schemas = schemas();
    OrderStateChangeDescriber::new()
        .check_fields(&schemas)
        .expect("all described fields exist");

    struct Renamed(OrderStateChangeDescriber);
    impl StateChangeEntityDescriber for Renamed {
        type State = OrderState;
        fn data_definition(&self) -> &EntityRef {
            self.0.data_definition()
        }
        fn owner_data_definition(&self) -> &EntityRef {
            self.0.owner_data_definition()
        }
        fn owner_field_name(&self) -> &str {
            "technology"
        }
    }

    let err = Renamed(OrderStateChangeDescriber::new())
        .check_fields(&schemas)
        .unwrap_err();
    assert!(
        matches!(&err, StateChangeError::MissingDescribedField { field, .. } if field == "technology"),
        "{err:?}"
    );
}
