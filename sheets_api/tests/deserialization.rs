use sheets_api::types::ValueRange;

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_members_range() {
    let json = load_fixture("members.json");
    let vr: ValueRange = serde_json::from_str(&json).unwrap();
    assert_eq!(vr.range, "Members!A2:S4");
    assert_eq!(vr.major_dimension, "ROWS");
    assert_eq!(vr.values.len(), 3);

    let smith = &vr.values[0];
    assert_eq!(smith[1], "1023");
    assert_eq!(smith[9], " A@X.com ");

    // trailing empty cells are not sent
    assert_eq!(vr.values[1].len(), 8);
}

#[test]
fn deserialize_empty_range() {
    let json = load_fixture("empty_range.json");
    let vr: ValueRange = serde_json::from_str(&json).unwrap();
    assert!(vr.values.is_empty());
    assert_eq!(vr.range, "SignIn!A2:M");
}

#[test]
fn deserialize_malformed_json_returns_error() {
    let bad_json = r#"{"values": not valid json}"#;
    let result = serde_json::from_str::<ValueRange>(bad_json);
    assert!(result.is_err());
}

#[test]
fn deserialize_non_array_values_returns_error() {
    let json = r#"{"range": "A1:B2", "values": "oops"}"#;
    let result = serde_json::from_str::<ValueRange>(json);
    assert!(result.is_err());
}
