//! End-to-end flow over a persona form with the builtin address group:
//! postcode autofill, manual narrowing, province switch, and submit.

use dynaform_form::{
    AddressTable, FieldSchema, FieldValue, FormController, FormError, OptionItem, WidgetKind,
    address_schema,
};
use pretty_assertions::assert_eq;

fn persona_fields() -> Vec<FieldSchema> {
    let mut fields = vec![
        FieldSchema::string("firstName", "ชื่อ").required().with_span(12),
        FieldSchema::string("lastName", "นามสกุล").required().with_span(12),
        FieldSchema::select(
            "gender",
            "เพศ",
            vec![OptionItem::new("ชาย", "male"), OptionItem::new("หญิง", "female")],
        )
        .required()
        .with_span(12),
        FieldSchema::number("age", "อายุ").with_span(12),
        FieldSchema::date("birthDate", "วันเกิด").with_span(12),
        FieldSchema::boolean("newsletter", "รับข่าวสาร").with_span(12),
    ];
    fields.extend(address_schema(AddressTable::builtin()));
    fields
}

#[test]
fn postcode_autofills_and_narrows() {
    let mut form = FormController::new(persona_fields()).unwrap();

    let dirty = form.set_value("postcode", FieldValue::from("40000")).unwrap();

    // Shared province and district fill in; the split sub-district does not
    assert_eq!(form.value("province"), Some(&FieldValue::from("ขอนแก่น")));
    assert_eq!(form.value("district"), Some(&FieldValue::from("เมืองขอนแก่น")));
    assert_eq!(form.value("subDistrict"), None);
    assert!(dirty.contains("province"));
    assert!(dirty.contains("subDistrict"));

    let widget = form
        .widgets()
        .into_iter()
        .find(|w| w.name == "subDistrict")
        .unwrap();
    assert_eq!(widget.kind, WidgetKind::Select);
    let labels: Vec<String> = widget.options.iter().map(|o| o.label.clone()).collect();
    assert_eq!(labels, vec!["ในเมือง", "บ้านเป็ด"]);
}

#[test]
fn single_record_postcode_fills_everything() {
    let mut form = FormController::new(persona_fields()).unwrap();

    form.set_value("postcode", FieldValue::from("40110")).unwrap();

    assert_eq!(form.value("province"), Some(&FieldValue::from("ขอนแก่น")));
    assert_eq!(form.value("district"), Some(&FieldValue::from("บ้านไผ่")));
    assert_eq!(form.value("subDistrict"), Some(&FieldValue::from("บ้านไผ่")));
}

#[test]
fn sub_district_pick_backfills_postcode() {
    let mut form = FormController::new(persona_fields()).unwrap();

    // The user knows the sub-district but not the postcode
    form.set_value("province", FieldValue::from("ขอนแก่น")).unwrap();
    form.set_value("district", FieldValue::from("เมืองขอนแก่น")).unwrap();
    form.set_value("subDistrict", FieldValue::from("บ้านเป็ด")).unwrap();

    assert_eq!(form.value("postcode"), Some(&FieldValue::from("40000")));
}

#[test]
fn province_switch_clears_descendants() {
    let mut form = FormController::new(persona_fields()).unwrap();

    form.set_value("postcode", FieldValue::from("40000")).unwrap();
    form.set_value("subDistrict", FieldValue::from("ในเมือง")).unwrap();

    let dirty = form.set_value("province", FieldValue::from("นครพนม")).unwrap();

    assert_eq!(form.value("district"), None);
    assert_eq!(form.value("subDistrict"), None);
    assert!(dirty.contains("district"));
    assert!(dirty.contains("subDistrict"));

    // The district list now reflects the new province
    let widget = form
        .widgets()
        .into_iter()
        .find(|w| w.name == "district")
        .unwrap();
    let labels: Vec<String> = widget.options.iter().map(|o| o.label.clone()).collect();
    assert_eq!(labels, vec!["เมืองนครพนม", "ธาตุพนม"]);
}

#[test]
fn submit_reports_every_missing_field() {
    let form = FormController::new(persona_fields()).unwrap();

    let report = form.submit().unwrap_err();
    let missing: Vec<&str> = report
        .iter()
        .filter_map(|e| match e {
            FormError::RequiredFieldMissing(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();

    // Every required field is reported at once, in declaration order
    assert_eq!(
        missing,
        vec!["firstName", "lastName", "gender", "postcode", "province", "district", "subDistrict"]
    );
}

#[test]
fn complete_form_submits() {
    let mut form = FormController::new(persona_fields()).unwrap();

    form.set_value("firstName", FieldValue::from("สมชาย")).unwrap();
    form.set_value("lastName", FieldValue::from("ใจดี")).unwrap();
    form.set_value("gender", FieldValue::from("male")).unwrap();
    form.set_value("age", FieldValue::from(32i64)).unwrap();
    form.set_value("birthDate", FieldValue::from("1994-02-10")).unwrap();
    form.set_value("newsletter", FieldValue::from(true)).unwrap();
    form.set_value("postcode", FieldValue::from("40000")).unwrap();
    form.set_value("subDistrict", FieldValue::from("ในเมือง")).unwrap();

    let values = form.submit().unwrap();
    assert_eq!(values.len(), 10);
    assert_eq!(values["province"], FieldValue::from("ขอนแก่น"));
    assert_eq!(values["subDistrict"], FieldValue::from("ในเมือง"));
    assert_eq!(values["birthDate"].key(), "1994-02-10");
}

#[test]
fn half_span_fields_share_rows() {
    let form = FormController::new(persona_fields()).unwrap();
    let rows = form.rows();

    // Ten span-12 fields pack two per row
    assert_eq!(rows.len(), 5);
    for row in &rows {
        assert_eq!(row.fields.len(), 2);
        assert_eq!(row.span, 24);
    }
}
