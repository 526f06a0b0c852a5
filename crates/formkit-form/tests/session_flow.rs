//! Session lifecycle: rejection and recovery, stale validation results,
//! the re-entrancy guard, error routing after item removal, input
//! normalization and the terminal states.

mod common;

use common::{array, award_ui, field, fill_item, recording_handler, session_with};
use formkit_core::{SessionError, SubmitRejected};
use formkit_form::{
    FormConfig, FormEvent, FormSession, OutlineRenderer, SessionState, SubmitOutcome, UiSchema,
    ValidationOutcome,
};
use formkit_schema::{FormSchema, Locale};
use serde_json::{json, Value};

fn quantity_session(ui: UiSchema) -> FormSession<String> {
    let schema = FormSchema::from_value(json!({
        "type": "object",
        "properties": {
            "quantita": {"type": "integer", "title": "Quantità"},
            "nota": {"type": "string"},
            "lotti": {
                "type": "array",
                "maxItems": 2,
                "items": {"type": "string"}
            }
        }
    }))
    .unwrap();
    FormSession::builder(schema).ui_schema(ui).build().unwrap()
}

#[test]
fn rejected_submit_returns_to_editing_with_data() {
    let mut session = session_with(json!({"aggiudicatario": [{}]}), award_ui());
    fill_item(&mut session, 0, "Z1");
    let before = session.value().clone();

    let mut reject =
        |_: &Value| -> Result<(), SubmitRejected> { Err(SubmitRejected::new("conflitto")) };
    let outcome = session.submit(&mut reject).unwrap();

    assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejected::new("conflitto")));
    assert_eq!(session.state(), SessionState::Editing);
    assert_eq!(session.value(), &before);

    let cig = field(&session, "/aggiudicatario/0/CIG");
    session.set_value(cig, json!("Z2")).unwrap();
    let mut accepted = Vec::new();
    let outcome = session
        .submit(&mut recording_handler(&mut accepted))
        .unwrap();
    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
    assert_eq!(accepted[0]["aggiudicatario"][0]["CIG"], json!("Z2"));
}

#[test]
fn history_records_every_transition() {
    let mut session = session_with(json!({"aggiudicatario": [{}]}), award_ui());
    session.validate().unwrap();
    fill_item(&mut session, 0, "Z1");
    let mut accepted = Vec::new();
    session
        .submit(&mut recording_handler(&mut accepted))
        .unwrap();

    let path: Vec<(SessionState, SessionState)> =
        session.history().iter().map(|t| (t.from, t.to)).collect();
    assert_eq!(
        path,
        vec![
            (SessionState::Editing, SessionState::Validating),
            (SessionState::Validating, SessionState::Invalid),
            (SessionState::Invalid, SessionState::Editing),
            (SessionState::Editing, SessionState::Validating),
            (SessionState::Validating, SessionState::Valid),
            (SessionState::Valid, SessionState::Submitted),
        ]
    );
    assert!(session
        .history()
        .windows(2)
        .all(|pair| pair[0].at <= pair[1].at));
}

#[test]
fn second_submit_while_validating_is_rejected() {
    let mut session = session_with(json!({"aggiudicatario": [{}]}), award_ui());
    let ticket = session.begin_validation().unwrap();
    assert!(session.submit_disabled());

    let mut accepted = Vec::new();
    let err = session
        .submit(&mut recording_handler(&mut accepted))
        .unwrap_err();
    assert_eq!(err, SessionError::ValidationInFlight);

    let cig = field(&session, "/aggiudicatario/0/CIG");
    assert_eq!(
        session.set_value(cig, json!("Z1")).unwrap_err(),
        SessionError::ValidationInFlight
    );

    let violations = session.run_validation(&ticket);
    let outcome = session.finish_validation(ticket, &violations);
    assert!(matches!(outcome, ValidationOutcome::Invalid { ref errors } if errors.len() == 4));
    assert!(accepted.is_empty());
}

#[test]
fn teardown_discards_in_flight_result() {
    let mut session = session_with(json!({"aggiudicatario": [{}]}), award_ui());
    let ticket = session.begin_validation().unwrap();
    let violations = session.run_validation(&ticket);

    session.teardown();
    assert_eq!(session.state(), SessionState::Disposed);
    assert_eq!(
        session.finish_validation(ticket, &violations),
        ValidationOutcome::Discarded
    );
    assert!(session.errors().is_empty());
    assert_eq!(session.begin_validation().unwrap_err(), SessionError::Disposed);
    assert_eq!(
        session.render(&mut OutlineRenderer::new()).unwrap_err(),
        SessionError::Disposed
    );

    // Idempotent.
    session.teardown();
    assert_eq!(session.history().len(), 2);
}

#[test]
fn removing_an_item_drops_its_errors_and_readdresses_the_rest() {
    let mut session = session_with(json!({"aggiudicatario": [{}, {}]}), award_ui());
    let arr = array(&session);
    fill_item(&mut session, 1, "Z2");
    session.set_value(field(&session, "/aggiudicatario/1/CIG"), json!("")).unwrap();

    let ValidationOutcome::Invalid { errors } = session.validate().unwrap() else {
        panic!("expected an invalid outcome");
    };
    assert_eq!(errors.len(), 5);

    let first = session.field(arr).unwrap().array().unwrap().keys()[0];
    assert!(session.remove_item(arr, first).unwrap());
    assert_eq!(session.state(), SessionState::Editing);

    let remaining = session.errors();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].path, "/aggiudicatario/0/CIG");
    assert_eq!(remaining[0].message, "CIG è obbligatorio");

    let cig = session.tree().find_pointer("/aggiudicatario/0/CIG").unwrap();
    assert_eq!(cig.errors(), remaining.as_slice());
    assert!(session.tree().find_pointer("/aggiudicatario/1").is_none());
    assert_eq!(session.value()["aggiudicatario"][0]["aggiudicatario"], json!("CNS"));
}

#[test]
fn writes_after_submission_are_rejected() {
    let mut session = session_with(json!({"aggiudicatario": [{}]}), award_ui());
    fill_item(&mut session, 0, "Z1");
    let mut accepted = Vec::new();
    session
        .submit(&mut recording_handler(&mut accepted))
        .unwrap();

    let arr = array(&session);
    assert!(matches!(
        session.add_item(arr).unwrap_err(),
        SessionError::InvalidTransition { ref state, .. } if state == "submitted"
    ));
    assert!(session.accept(&mut recording_handler(&mut accepted)).is_err());
    assert_eq!(accepted.len(), 1);

    let outline = session.render(&mut OutlineRenderer::new()).unwrap();
    assert!(outline.ends_with("[Salva] [disabilitato]"));
}

#[test]
fn events_drive_writes_focus_and_touch() {
    let mut session = quantity_session(UiSchema::default());
    let quantita = field(&session, "/quantita");

    session.dispatch(FormEvent::Focus { field: quantita }).unwrap();
    assert!(session.field(quantita).unwrap().is_focused());

    session
        .dispatch(FormEvent::Change {
            field: quantita,
            value: json!("12"),
        })
        .unwrap();
    session.dispatch(FormEvent::Blur { field: quantita }).unwrap();

    let controller = session.field(quantita).unwrap();
    assert!(controller.is_dirty());
    assert!(controller.is_touched());
    assert!(!controller.is_focused());
    assert_eq!(session.field_value(quantita), Some(&json!(12)));
}

#[test]
fn clearing_text_removes_the_value_unless_empty_value_is_set() {
    let mut session = quantity_session(UiSchema::default());
    let nota = field(&session, "/nota");
    session.set_value(nota, json!("ciao")).unwrap();
    session.set_value(nota, json!("")).unwrap();
    assert_eq!(session.field_value(nota), None);
    assert!(session.value().get("nota").is_none());

    let ui = UiSchema::from_value(&json!({"nota": {"ui:options": {"emptyValue": "-"}}}));
    let mut session = quantity_session(ui);
    let nota = field(&session, "/nota");
    session.set_value(nota, json!("")).unwrap();
    assert_eq!(session.field_value(nota), Some(&json!("-")));
}

#[test]
fn unparsable_number_is_reported_by_the_validator() {
    let mut session = quantity_session(UiSchema::default());
    let quantita = field(&session, "/quantita");
    session.set_value(quantita, json!("dodici")).unwrap();

    let ValidationOutcome::Invalid { errors } = session.validate().unwrap() else {
        panic!("expected an invalid outcome");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "/quantita");
    assert!(errors[0].message.starts_with("deve essere di tipo"));
}

#[test]
fn max_items_disables_add() {
    let mut session = quantity_session(UiSchema::default());
    let lotti = field(&session, "/lotti");
    assert!(session.add_item(lotti).unwrap().is_some());
    assert!(session.add_item(lotti).unwrap().is_some());
    assert_eq!(session.add_item(lotti).unwrap(), None);
    assert_eq!(session.value()["lotti"].as_array().unwrap().len(), 2);

    let outline = session.render(&mut OutlineRenderer::new()).unwrap();
    assert!(!outline.contains("Aggiungi"));
    assert!(outline.contains("[Rimuovi elemento]") || outline.contains("[Rimuovi lotti]"));
}

#[test]
fn wrong_targets_are_errors() {
    let mut session = quantity_session(UiSchema::default());
    let root = session.tree().root();
    let nota = field(&session, "/nota");

    assert!(matches!(
        session.set_value(root, json!({})).unwrap_err(),
        SessionError::NotALeaf(_)
    ));
    assert!(matches!(
        session.add_item(nota).unwrap_err(),
        SessionError::NotAnArray(_)
    ));
    assert!(matches!(
        session
            .set_value(formkit_core::FieldId(999), json!(1))
            .unwrap_err(),
        SessionError::UnknownField(_)
    ));
}

#[test]
fn error_list_and_locale_follow_config() {
    let config = FormConfig {
        show_error_list: true,
        locale: Locale::En,
        submit_label: "Save".to_string(),
        ..FormConfig::default()
    };
    let mut session: FormSession<String> = FormSession::builder(common::award_schema())
        .form_data(json!({"aggiudicatario": [{}]}))
        .config(config)
        .build()
        .unwrap();
    session.validate().unwrap();

    let outline = session.render(&mut OutlineRenderer::new()).unwrap();
    assert!(outline.contains("Errori:"));
    assert!(outline.contains("- /aggiudicatario/0/CIG: CIG is required"));
    assert!(outline.contains("! numero_lotto is required"));
    assert!(outline.ends_with("[Save]"));
}
