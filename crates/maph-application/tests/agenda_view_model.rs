mod common;

use common::{Call, MockResourceClient, appointment, patient, session, wait_for_calls};
use maph_application::AgendaViewModel;
use maph_core::MaphError;
use maph_core::agenda::{AgendaPhase, HourSlot};
use maph_core::resource::{ApiError, Resource};
use serde_json::json;
use std::sync::Arc;

fn view_model(client: &Arc<MockResourceClient>) -> Arc<AgendaViewModel> {
    Arc::new(AgendaViewModel::new(client.clone(), session()))
}

async fn fill_draft(vm: &AgendaViewModel) {
    vm.select_date("2024-06-01".parse().unwrap()).await;
    vm.edit_draft(|draft| {
        draft.patient_id = Some("202".into());
        draft.start_hour = HourSlot::new(10);
        draft.end_hour = HourSlot::new(11);
    })
    .await;
}

#[tokio::test]
async fn test_mount_loads_events_and_patients() {
    let client = MockResourceClient::new();
    client.set_list(
        Resource::Diary,
        vec![
            appointment(1, "2024-06-01", "Carlos"),
            appointment(2, "2024-06-02", "Eva"),
        ],
    );
    client.set_list(Resource::Patients, vec![patient("202", "Carlos")]);

    let vm = view_model(&client);
    assert_eq!(vm.phase().await, AgendaPhase::Idle);
    vm.mount().await.unwrap();

    assert_eq!(vm.phase().await, AgendaPhase::Ready);
    let state = vm.snapshot().await;
    assert_eq!(state.events().len(), 2);
    assert_eq!(state.patients().len(), 1);
    assert_eq!(state.marked_days().len(), 2);
}

#[tokio::test]
async fn test_events_follow_selected_date() {
    let client = MockResourceClient::new();
    client.set_list(
        Resource::Diary,
        vec![
            appointment(1, "2024-06-01", "Carlos"),
            appointment(2, "2024-06-02", "Eva"),
            appointment(3, "2024-06-01", "Luis"),
        ],
    );
    let vm = view_model(&client);
    vm.load_events().await.unwrap();

    assert!(vm.events_for_selected_date().await.is_empty());

    vm.select_date("2024-06-01".parse().unwrap()).await;
    let titles: Vec<String> = vm
        .events_for_selected_date()
        .await
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["Dr. Solis - Carlos", "Dr. Solis - Luis"]);
}

#[tokio::test]
async fn test_day_events_tell_unselected_from_empty_day() {
    let client = MockResourceClient::new();
    client.set_list(Resource::Diary, vec![appointment(1, "2024-06-01", "Carlos")]);
    let vm = view_model(&client);
    vm.load_events().await.unwrap();

    let (selected, count) = vm
        .with_day_events(|events| (events.is_date_selected(), events.count()))
        .await;
    assert!(!selected);
    assert_eq!(count, 0);

    vm.select_date("2024-06-05".parse().unwrap()).await;
    let (selected, count) = vm
        .with_day_events(|events| (events.is_date_selected(), events.count()))
        .await;
    assert!(selected);
    assert_eq!(count, 0);

    vm.select_date("2024-06-01".parse().unwrap()).await;
    let ids: Vec<String> = vm
        .with_day_events(|events| events.map(|e| e.id.clone()).collect())
        .await;
    assert_eq!(ids, vec!["1"]);
}

#[tokio::test]
async fn test_null_patient_name_does_not_block_the_agenda() {
    let client = MockResourceClient::new();
    client.set_list(
        Resource::Diary,
        vec![
            appointment(1, "2024-06-01", "Carlos"),
            json!({
                "numero_cita": 2,
                "fecha": "2024-06-01T00:00:00.000Z",
                "nombre_usuario": "Dr. Solis",
                "nombre_paciente": null,
                "hora_inicio": "10:00",
                "hora_final": "11:00"
            }),
        ],
    );
    let vm = view_model(&client);
    vm.load_events().await.unwrap();

    vm.select_date("2024-06-01".parse().unwrap()).await;
    let titles: Vec<String> = vm
        .events_for_selected_date()
        .await
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["Dr. Solis - Carlos", "Dr. Solis - "]);
}

#[tokio::test]
async fn test_failed_load_keeps_previous_events() {
    let client = MockResourceClient::new();
    client.set_list(Resource::Diary, vec![appointment(1, "2024-06-01", "Carlos")]);
    let vm = view_model(&client);
    vm.load_events().await.unwrap();

    client.fail_list(
        Resource::Diary,
        ApiError::Status {
            status: 500,
            message: Some("database offline".into()),
        },
    );
    let err = vm.load_events().await.unwrap_err();

    assert!(matches!(err, MaphError::Fetch(_)));
    assert_eq!(err.user_message(), "database offline");
    assert_eq!(vm.read(|s| s.events().len()).await, 1);
    assert_eq!(vm.phase().await, AgendaPhase::Ready);
}

#[tokio::test]
async fn test_unreadable_date_fails_the_whole_load() {
    let client = MockResourceClient::new();
    client.set_list(
        Resource::Diary,
        vec![
            appointment(1, "2024-06-01", "Carlos"),
            json!({"numero_cita": 2, "fecha": "soon", "hora_inicio": "8:00", "hora_final": "9:00"}),
        ],
    );
    let vm = view_model(&client);

    assert!(matches!(vm.load_events().await, Err(MaphError::Fetch(_))));
    assert!(vm.read(|s| s.events().is_empty()).await);
}

#[tokio::test]
async fn test_create_validation_makes_no_request() {
    let client = MockResourceClient::new();
    let vm = view_model(&client);
    vm.select_date("2024-06-01".parse().unwrap()).await;

    let err = vm.create_appointment().await.unwrap_err();
    match err {
        MaphError::Validation(v) => assert_eq!(v.field(), "patient"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_create_success_resets_draft_and_reloads() {
    let client = MockResourceClient::new();
    let vm = view_model(&client);
    fill_draft(&vm).await;

    vm.create_appointment().await.unwrap();

    let calls = client.calls();
    assert_eq!(
        calls[0],
        Call::Create(
            Resource::Diary,
            json!({
                "id_empresa": "7",
                "id_cedula_usuario": "101",
                "id_cedula_paciente": "202",
                "fecha": "2024-06-01",
                "hora_inicio": "10:00",
                "hora_final": "11:00"
            })
        )
    );
    assert_eq!(calls[1], Call::List(Resource::Diary));

    let draft = vm.read(|s| s.draft().clone()).await;
    assert!(draft.patient_id.is_none());
    assert!(draft.start_hour.is_none());
    assert_eq!(draft.date.map(|d| d.to_string()).as_deref(), Some("2024-06-01"));
    assert_eq!(vm.phase().await, AgendaPhase::Ready);
}

#[tokio::test]
async fn test_inverted_hours_are_submitted() {
    let client = MockResourceClient::new();
    let vm = view_model(&client);
    fill_draft(&vm).await;
    vm.edit_draft(|d| {
        d.start_hour = HourSlot::new(15);
        d.end_hour = HourSlot::new(9);
    })
    .await;

    vm.create_appointment().await.unwrap();
    assert!(matches!(&client.calls()[0], Call::Create(Resource::Diary, _)));
}

#[tokio::test]
async fn test_create_failure_keeps_draft() {
    let client = MockResourceClient::new();
    client.fail_mutations(
        Resource::Diary,
        ApiError::Status {
            status: 409,
            message: Some("slot taken".into()),
        },
    );
    let vm = view_model(&client);
    fill_draft(&vm).await;

    let err = vm.create_appointment().await.unwrap_err();
    assert!(matches!(err, MaphError::Create(_)));
    assert_eq!(err.user_message(), "slot taken");

    assert_eq!(vm.read(|s| s.draft().patient_id.clone()).await.as_deref(), Some("202"));
    assert_eq!(client.calls().len(), 1);
    assert_eq!(vm.phase().await, AgendaPhase::Ready);
}

#[tokio::test]
async fn test_create_failure_without_message_uses_fallback() {
    let client = MockResourceClient::new();
    client.fail_mutations(Resource::Diary, ApiError::Timeout);
    let vm = view_model(&client);
    fill_draft(&vm).await;

    let err = vm.create_appointment().await.unwrap_err();
    assert_eq!(err.user_message(), "Could not create the appointment.");
}

#[tokio::test]
async fn test_delete_success_reloads() {
    let client = MockResourceClient::new();
    client.set_list(Resource::Diary, vec![appointment(1, "2024-06-01", "Carlos")]);
    let vm = view_model(&client);
    vm.load_events().await.unwrap();

    client.set_list(Resource::Diary, Vec::new());
    vm.delete_appointment("1").await.unwrap();

    assert_eq!(client.calls()[1], Call::Delete(Resource::Diary, "1".into()));
    assert!(vm.read(|s| s.events().is_empty()).await);
}

#[tokio::test]
async fn test_delete_failure_leaves_events() {
    let client = MockResourceClient::new();
    client.set_list(Resource::Diary, vec![appointment(1, "2024-06-01", "Carlos")]);
    let vm = view_model(&client);
    vm.load_events().await.unwrap();

    client.fail_mutations(Resource::Diary, ApiError::Transport("reset".into()));
    let err = vm.delete_appointment("1").await.unwrap_err();

    assert!(matches!(err, MaphError::Delete(_)));
    assert_eq!(vm.read(|s| s.events().len()).await, 1);
    assert_eq!(client.calls().len(), 2);
}

#[tokio::test]
async fn test_second_submit_while_submitting_is_busy() {
    let client = MockResourceClient::new();
    let vm = view_model(&client);
    fill_draft(&vm).await;

    client.hold();
    let first = {
        let vm = vm.clone();
        tokio::spawn(async move { vm.create_appointment().await })
    };
    wait_for_calls(&client, 1).await;
    assert_eq!(vm.phase().await, AgendaPhase::Submitting);

    assert_eq!(vm.create_appointment().await.unwrap_err(), MaphError::Busy);
    assert_eq!(vm.delete_appointment("9").await.unwrap_err(), MaphError::Busy);
    assert_eq!(client.mutation_calls().len(), 1);

    client.release();
    first.await.unwrap().unwrap();
    assert_eq!(vm.phase().await, AgendaPhase::Ready);
}

#[tokio::test]
async fn test_response_after_unmount_is_dropped() {
    let client = MockResourceClient::new();
    client.set_list(Resource::Diary, vec![appointment(1, "2024-06-01", "Carlos")]);
    let vm = view_model(&client);

    client.hold();
    let pending = {
        let vm = vm.clone();
        tokio::spawn(async move { vm.load_events().await })
    };
    wait_for_calls(&client, 1).await;

    vm.unmount();
    client.release();
    pending.await.unwrap().unwrap();

    assert!(vm.read(|s| s.events().is_empty()).await);
    assert!(!vm.is_mounted());
}
