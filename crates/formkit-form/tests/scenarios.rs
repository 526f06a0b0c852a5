//! End-to-end scenarios over the award notice form: required-field
//! errors, a successful submit, stable array item keys, non-removable
//! items and widget overrides.

mod common;

use std::sync::Arc;

use common::{array, award_ui, field, fill_item, recording_handler, session_with};
use formkit_form::{FormSession, OutlineRenderer, SessionState, SubmitOutcome, UiSchema, WidgetProps};
use serde_json::json;

#[test]
fn empty_item_reports_four_required_errors() {
    let mut session = session_with(json!({"aggiudicatario": [{}]}), award_ui());
    let mut accepted = Vec::new();

    let outcome = session
        .submit(&mut recording_handler(&mut accepted))
        .unwrap();

    let SubmitOutcome::Invalid { errors } = outcome else {
        panic!("expected an invalid outcome");
    };
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "CIG è obbligatorio",
            "aggiudicatario è obbligatorio",
            "aggiudicazione_cns è obbligatorio",
            "numero_lotto è obbligatorio",
        ]
    );
    assert_eq!(session.state(), SessionState::Invalid);
    assert!(accepted.is_empty());

    for name in ["CIG", "aggiudicatario", "aggiudicazione_cns", "numero_lotto"] {
        let pointer = format!("/aggiudicatario/0/{name}");
        let controller = session.tree().find_pointer(&pointer).unwrap();
        assert_eq!(controller.errors().len(), 1, "errors at {pointer}");
        assert!(controller.required());
    }
    // Nothing the user typed is lost.
    assert_eq!(session.value(), &json!({"aggiudicatario": [{}]}));
}

#[test]
fn filled_item_submits_snapshot_once() {
    let mut session = session_with(json!({"aggiudicatario": [{}]}), award_ui());
    fill_item(&mut session, 0, "Z1234567890");
    let mut accepted = Vec::new();

    let outcome = session
        .submit(&mut recording_handler(&mut accepted))
        .unwrap();

    let expected = json!({
        "aggiudicatario": [{
            "CIG": "Z1234567890",
            "aggiudicatario": "CNS",
            "aggiudicazione_cns": true,
            "numero_lotto": "X"
        }]
    });
    assert_eq!(outcome, SubmitOutcome::Submitted(expected.clone()));
    assert_eq!(accepted, vec![expected]);
    assert_eq!(session.state(), SessionState::Submitted);
    assert!(session.errors().is_empty());
}

#[test]
fn added_items_keep_their_keys_across_removal() {
    let mut session = session_with(json!({"aggiudicatario": []}), award_ui());
    let arr = array(&session);

    let first = session.add_item(arr).unwrap().unwrap();
    let second = session.add_item(arr).unwrap().unwrap();
    assert_ne!(first, second);
    assert_eq!(session.field(arr).unwrap().array().unwrap().len(), 2);
    assert_eq!(session.value()["aggiudicatario"].as_array().unwrap().len(), 2);

    assert!(session.remove_item(arr, first).unwrap());

    let items = session.field(arr).unwrap().array().unwrap();
    assert_eq!(items.keys(), vec![second]);
    let survivor = session.field(items.items()[0].field).unwrap();
    assert_eq!(survivor.path().to_pointer(), "/aggiudicatario/0");
    assert_eq!(session.value()["aggiudicatario"].as_array().unwrap().len(), 1);
}

#[test]
fn non_removable_items_ignore_remove() {
    let ui = UiSchema::from_value(&json!({"aggiudicatario": {"removable": false}}));
    let mut session = session_with(json!({"aggiudicatario": [{}]}), ui);
    let arr = array(&session);
    let key = session.field(arr).unwrap().array().unwrap().keys()[0];

    assert!(!session.remove_item(arr, key).unwrap());
    assert_eq!(session.field(arr).unwrap().array().unwrap().len(), 1);
    assert_eq!(session.value(), &json!({"aggiudicatario": [{}]}));

    let outline = session.render(&mut OutlineRenderer::new()).unwrap();
    assert!(!outline.contains("Rimuovi"));
    assert!(outline.contains("[Aggiungi Aggiudicatario]"));
}

#[test]
fn checkbox_override_replaces_builtin() {
    let mut session: FormSession<String> = FormSession::builder(common::award_schema())
        .ui_schema(award_ui())
        .form_data(json!({"aggiudicatario": [{}]}))
        .widget(
            "CheckboxWidget",
            Arc::new(|props: &WidgetProps<'_>| format!("<custom-checkbox {}>", props.id)),
        )
        .build()
        .unwrap();

    let cns = field(&session, "/aggiudicatario/0/aggiudicazione_cns");
    assert!(session.field(cns).unwrap().widget().unwrap().is_override());

    let outline = session.render(&mut OutlineRenderer::new()).unwrap();
    assert!(outline.contains("<custom-checkbox root_aggiudicatario_0_aggiudicazione_cns>"));
    assert!(!outline.contains("[ ]"));

    // Text fields are untouched by the override.
    assert!(outline.contains("<TextWidget>"));
    session.teardown();
}
