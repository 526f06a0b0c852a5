//! Shared fixtures for the form integration tests.

#![allow(dead_code)]

use formkit_core::{FieldId, SubmitRejected};
use formkit_form::{FormSession, UiSchema};
use formkit_schema::FormSchema;
use serde_json::{json, Value};

/// The award notice schema: a required array of awardees, each requiring
/// four properties.
pub fn award_schema() -> FormSchema {
    FormSchema::from_value(json!({
        "title": "Generated Schema",
        "type": "object",
        "required": ["aggiudicatario"],
        "properties": {
            "aggiudicatario": {
                "type": "array",
                "title": "Aggiudicatario",
                "items": {
                    "type": "object",
                    "required": ["CIG", "aggiudicatario", "aggiudicazione_cns", "numero_lotto"],
                    "properties": {
                        "CIG": {"type": "string", "title": "CIG"},
                        "aggiudicatario": {
                            "type": "string",
                            "title": "Nominativo aggiudicatario. Se si tratta di CNS (consorzio nazionale servizi) completa solo con CNS."
                        },
                        "aggiudicazione_cns": {
                            "type": "boolean",
                            "title": "True se l'aggiudicatario è CNS (consorzio nazionale servizi)."
                        },
                        "numero_lotto": {
                            "type": "string",
                            "title": "numero del lotto in questione, se non presente scrivi X."
                        }
                    }
                }
            }
        }
    }))
    .expect("award schema parses")
}

pub fn award_ui() -> UiSchema {
    UiSchema::from_value(&json!({
        "aggiudicatario": {"ui:classNames": "aggiudicatario-item-class"}
    }))
}

pub fn session_with(data: Value, ui: UiSchema) -> FormSession<String> {
    FormSession::builder(award_schema())
        .ui_schema(ui)
        .form_data(data)
        .build()
        .expect("session builds")
}

/// Handle of the controller at `pointer`.
pub fn field(session: &FormSession<String>, pointer: &str) -> FieldId {
    session
        .tree()
        .find_pointer(pointer)
        .unwrap_or_else(|| panic!("no field at {pointer}"))
        .id()
}

pub fn array(session: &FormSession<String>) -> FieldId {
    field(session, "/aggiudicatario")
}

/// Fill the four required properties of item `index`.
pub fn fill_item(session: &mut FormSession<String>, index: usize, cig: &str) {
    let base = format!("/aggiudicatario/{index}");
    let writes = [
        ("CIG", json!(cig)),
        ("aggiudicatario", json!("CNS")),
        ("aggiudicazione_cns", json!(true)),
        ("numero_lotto", json!("X")),
    ];
    for (name, value) in writes {
        let id = field(session, &format!("{base}/{name}"));
        session.set_value(id, value).expect("write succeeds");
    }
}

/// A submit handler that records every snapshot it accepts.
pub fn recording_handler(
    accepted: &mut Vec<Value>,
) -> impl FnMut(&Value) -> Result<(), SubmitRejected> + '_ {
    move |snapshot: &Value| {
        accepted.push(snapshot.clone());
        Ok(())
    }
}
