use sheets_api::{Client, ValueRenderOption, ValuesQuery};
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_values_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("members.json");

    Mock::given(method("GET"))
        .and(path_regex(r"^/spreadsheets/sheet-1/values/Members"))
        .and(query_param("key", "test-key"))
        .and(query_param("quotaUser", "tag-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "sheet-1", "test-key").unwrap();
    let result = client
        .get_values("Members!A2:S", "tag-1", &ValuesQuery::default())
        .await;
    assert!(result.is_ok());

    let vr = result.unwrap();
    assert_eq!(vr.values.len(), 3);
    assert_eq!(vr.values[0][0], "Smith");
    assert_eq!(vr.values[1].len(), 8);
}

#[tokio::test]
async fn get_values_passes_render_option() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("members.json");

    Mock::given(method("GET"))
        .and(query_param("valueRenderOption", "UNFORMATTED_VALUE"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "sheet-1", "test-key").unwrap();
    let query = ValuesQuery::default().with_value_render_option(ValueRenderOption::UnformattedValue);
    let result = client.get_values("Members!A2:S", "tag-1", &query).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn get_values_empty_range() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("empty_range.json");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "sheet-1", "test-key").unwrap();
    let vr = client
        .get_values("SignIn!A2:M", "tag-1", &ValuesQuery::default())
        .await
        .unwrap();
    assert!(vr.values.is_empty());
}

#[tokio::test]
async fn get_values_quota_exhausted() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("error_quota.json");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "sheet-1", "test-key").unwrap();
    let err = client
        .get_values("Accounts!A4:AR", "tag-1", &ValuesQuery::default())
        .await
        .unwrap_err();
    assert!(err.is_quota_exhausted());
    assert!(!err.is_auth_failure());
}

#[tokio::test]
async fn get_values_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "sheet-1", "bad-key").unwrap();
    let err = client
        .get_values("Accounts!A4:AR", "tag-1", &ValuesQuery::default())
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn get_values_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "sheet-1", "test-key").unwrap();
    let result = client
        .get_values("Members!A2:S", "tag-1", &ValuesQuery::default())
        .await;
    assert!(matches!(result, Err(sheets_api::Error::RequestFailed)));
}
