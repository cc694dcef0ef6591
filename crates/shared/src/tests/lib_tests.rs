use serde_json::json;

use crate::{
    domain::VisitType,
    error::describe_error_body,
    protocol::{PreregistrationRequest, PreregistrationResult},
};

#[test]
fn request_uses_backend_field_names_and_keeps_null_optionals() {
    let request = PreregistrationRequest {
        visitor_name: "Ana".to_string(),
        visit_datetime: "2024-05-01T10:00".to_string(),
        visit_type: VisitType::Visita,
        plate: None,
        notes: Some("Llega tarde".to_string()),
    };

    let body = serde_json::to_value(&request).expect("serialize");
    assert_eq!(
        body,
        json!({
            "nombre_visitante": "Ana",
            "fecha_visita": "2024-05-01T10:00",
            "tipo_visita": "Visita",
            "placa": null,
            "notas": "Llega tarde",
        })
    );
}

#[test]
fn visit_type_parses_labels_case_insensitively() {
    assert_eq!("servicio".parse::<VisitType>(), Ok(VisitType::Servicio));
    assert_eq!(" Visita ".parse::<VisitType>(), Ok(VisitType::Visita));
    assert!("Proveedor".parse::<VisitType>().is_err());
    assert_eq!(VisitType::default(), VisitType::Visita);
}

#[test]
fn result_keeps_backend_fields_besides_qr() {
    let result = PreregistrationResult::from_body(json!({
        "qr_base64": "iVBORw0KGgo",
        "visita_id": 17,
        "token": "abc123",
    }))
    .expect("qr present");

    assert_eq!(result.qr_base64, "iVBORw0KGgo");
    assert_eq!(result.field("visita_id"), Some(&json!(17)));
    assert!(result.field("qr_base64").is_none());

    let round = serde_json::to_value(&result).expect("serialize");
    assert_eq!(round["token"], "abc123");
    assert_eq!(round["qr_base64"], "iVBORw0KGgo");
}

#[test]
fn result_requires_string_qr_field() {
    assert!(PreregistrationResult::from_body(json!({"status": "ok"})).is_none());
    assert!(PreregistrationResult::from_body(json!({"qr_base64": null})).is_none());
    assert!(PreregistrationResult::from_body(json!(["qr_base64"])).is_none());
}

#[test]
fn describes_plain_and_validation_error_bodies() {
    assert_eq!(
        describe_error_body(r#"{"detail":"Usuario no encontrado"}"#),
        "Usuario no encontrado"
    );
    assert_eq!(
        describe_error_body(
            r#"{"detail":[{"loc":["body","fecha_visita"],"msg":"invalid datetime format","type":"value_error.datetime"}]}"#
        ),
        "body.fecha_visita: invalid datetime format"
    );
    assert_eq!(describe_error_body("  "), "<empty body>");
    assert_eq!(describe_error_body("Internal Server Error"), "Internal Server Error");
}
