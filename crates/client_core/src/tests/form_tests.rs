use super::*;

#[test]
fn blank_optionals_become_null_and_required_fields_pass_through() {
    let form = PreregistrationForm::default();
    let request = form.to_request();

    assert_eq!(request.visitor_name, "");
    assert_eq!(request.visit_datetime, "");
    assert_eq!(request.visit_type, VisitType::Visita);
    assert_eq!(request.plate, None);
    assert_eq!(request.notes, None);

    let body = serde_json::to_value(&request).expect("serialize");
    let keys: Vec<&str> = body
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    for key in ["nombre_visitante", "fecha_visita", "tipo_visita", "placa", "notas"] {
        assert!(keys.contains(&key), "missing key {key}");
    }
    assert!(body["placa"].is_null());
    assert!(body["notas"].is_null());
}

#[test]
fn optional_values_are_sent_verbatim() {
    let form = PreregistrationForm {
        plate: " ABC-123 ".to_string(),
        notes: "Llega con retraso".to_string(),
        ..PreregistrationForm::default()
    };
    let request = form.to_request();

    assert_eq!(request.plate.as_deref(), Some(" ABC-123 "));
    assert_eq!(request.notes.as_deref(), Some("Llega con retraso"));
}

#[test]
fn reset_restores_defaults() {
    let mut form = PreregistrationForm {
        visitor_name: "Ana".to_string(),
        visit_type: VisitType::Servicio,
        ..PreregistrationForm::default()
    };
    assert!(!form.is_blank());
    form.reset();
    assert!(form.is_blank());
}
