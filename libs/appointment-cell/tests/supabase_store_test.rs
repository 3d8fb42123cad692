use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use appointment_cell::models::{AppointmentChanges, AppointmentError, NewAppointment};
use appointment_cell::{AppointmentStore, SupabaseAppointmentStore};
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

async fn create_store() -> (MockServer, SupabaseAppointmentStore) {
    let mock_server = MockServer::start().await;

    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();

    (mock_server, SupabaseAppointmentStore::new(&config))
}

fn new_appointment() -> NewAppointment {
    NewAppointment {
        client_name: "Ana Pop".to_string(),
        client_phone: "0722000000".to_string(),
        service: "Haircut".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_insert_returns_stored_row() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "client_name": "Ana Pop",
            "date": "2024-06-01",
            "time": "10:00:00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::appointment_row(17, "Ana Pop", "Haircut", "2024-06-01", "10:00:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let stored = store.insert(new_appointment()).await.unwrap();

    assert_eq!(stored.id, 17);
    assert_eq!(stored.client_name, "Ana Pop");
    assert_eq!(stored.time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
}

#[tokio::test]
async fn test_insert_unique_violation_is_slot_taken() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockSupabaseResponses::unique_violation()))
        .mount(&mock_server)
        .await;

    let result = store.insert(new_appointment()).await;
    assert_matches!(result, Err(AppointmentError::SlotTaken(slot)) if slot.to_string() == "2024-06-01 10:00");
}

#[tokio::test]
async fn test_find_by_slot_filters_on_date_and_time() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date", "eq.2024-06-01"))
        .and(query_param("time", "eq.10:00:00"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row(3, "Ana Pop", "Haircut", "2024-06-01", "10:00:00")
        ])))
        .mount(&mock_server)
        .await;

    let hit = store
        .find_by_slot(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(hit.map(|appt| appt.id), Some(3));
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.9999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    assert_matches!(store.get(9999).await, Err(AppointmentError::NotFound(9999)));
}

#[tokio::test]
async fn test_list_requests_slot_ordering() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "date.asc,time.asc,id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row(2, "Ana", "Haircut", "2024-06-01", "10:00:00"),
            MockSupabaseResponses::appointment_row(1, "Ion", "Styling", "2024-06-02", "09:00:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointments = store.list_all_ordered().await.unwrap();
    let ids: Vec<i64> = appointments.iter().map(|appt| appt.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_update_patches_by_id() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.4"))
        .and(body_partial_json(json!({ "service": "Manicure" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row(4, "Ana", "Manicure", "2024-06-01", "10:00:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let updated = store
        .update(4, AppointmentChanges {
            service: Some("Manicure".to_string()),
            ..AppointmentChanges::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.service, "Manicure");
}

#[tokio::test]
async fn test_update_onto_taken_slot_is_slot_taken() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.4"))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockSupabaseResponses::unique_violation()))
        .mount(&mock_server)
        .await;

    let result = store
        .update(4, AppointmentChanges {
            date: Some(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()),
            time: Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            ..AppointmentChanges::default()
        })
        .await;

    assert_matches!(result, Err(AppointmentError::SlotTaken(slot)) if slot.to_string() == "2024-06-02 09:00");
}

#[tokio::test]
async fn test_time_only_update_onto_taken_slot_is_slot_taken() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.4"))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockSupabaseResponses::unique_violation()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row(4, "Ana", "Haircut", "2024-06-01", "10:00:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = store
        .update(4, AppointmentChanges {
            time: Some(NaiveTime::from_hms_opt(11, 30, 0).unwrap()),
            ..AppointmentChanges::default()
        })
        .await;

    assert_matches!(result, Err(AppointmentError::SlotTaken(slot)) if slot.to_string() == "2024-06-01 11:30");
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = store
        .update(77, AppointmentChanges {
            client_name: Some("Nobody".to_string()),
            ..AppointmentChanges::default()
        })
        .await;

    assert_matches!(result, Err(AppointmentError::NotFound(77)));
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.9999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    assert_matches!(store.delete(9999).await, Err(AppointmentError::NotFound(9999)));
}

#[tokio::test]
async fn test_delete_existing_row() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row(5, "Ana", "Haircut", "2024-06-01", "10:00:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(store.delete(5).await.is_ok());
}

#[tokio::test]
async fn test_server_error_is_storage_error() {
    let (mock_server, store) = create_store().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    assert_matches!(store.list_all_ordered().await, Err(AppointmentError::StorageError(_)));
}
