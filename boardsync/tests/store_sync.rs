//! End-to-end store tests against a mock backend
//!
//! These exercise the optimistic-update/rollback protocol over real HTTP:
//! a wiremock server plays the REST backend, and assertions check both the
//! resulting state and the dense-position invariant.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use boardsync::persist::MemoryStore;
use boardsync::types::{BoardId, ListId, PriorityId, TaskId};
use boardsync::{ApiClient, ApiConfig, BoardStore, Command, Notice, Notifier, SyncError};

fn store_for(server: &MockServer) -> (BoardStore, mpsc::UnboundedReceiver<Notice>) {
    let config = ApiConfig::with_base_url(server.uri());
    let api = ApiClient::new(&config, Arc::new(MemoryStore::new())).unwrap();
    let (notifier, rx) = Notifier::channel();
    (BoardStore::new(api, notifier), rx)
}

fn task_json(id: i64, list_id: i64, title: &str, position: usize) -> serde_json::Value {
    json!({
        "id": id,
        "uid": format!("uid-{id}"),
        "listId": list_id,
        "title": title,
        "position": position,
    })
}

/// Board 1 "Sprint 1": list 1 "Todo" = [t1, t2, t3], list 2 "Done" = []
fn board_json() -> serde_json::Value {
    json!({
        "id": 1,
        "title": "Sprint 1",
        "lists": [
            {
                "id": 1,
                "title": "Todo",
                "tasks": [
                    task_json(1, 1, "t1", 0),
                    task_json(2, 1, "t2", 1),
                    task_json(3, 1, "t3", 2),
                ],
            },
            { "id": 2, "title": "Done", "tasks": [] },
        ],
    })
}

async fn mount_board(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/boards/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(board_json()))
        .mount(server)
        .await;
}

fn positions(store: &BoardStore, list_id: i64) -> Vec<(i64, usize)> {
    store
        .lists()
        .into_iter()
        .find(|l| l.id == ListId::from(list_id))
        .map(|l| l.tasks.iter().map(|t| (t.id.value(), t.position)).collect())
        .unwrap()
}

async fn loaded_store(server: &MockServer) -> (BoardStore, mpsc::UnboundedReceiver<Notice>) {
    mount_board(server).await;
    let (store, rx) = store_for(server);
    store.fetch_board(BoardId::from(1)).await.unwrap();
    (store, rx)
}

#[tokio::test]
async fn fetch_board_loads_and_normalizes() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    assert_eq!(store.board_id(), BoardId::from(1));
    assert_eq!(store.board_title(), "Sprint 1");
    assert_eq!(positions(&store, 1), vec![(1, 0), (2, 1), (3, 2)]);
}

#[tokio::test]
async fn fetch_board_failure_is_fatal_for_the_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/boards/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"msg": "no such board"})))
        .mount(&server)
        .await;

    let (store, mut rx) = store_for(&server);
    let err = store.fetch_board(BoardId::from(9)).await.unwrap_err();

    assert!(matches!(err, SyncError::Api { status: 404, .. }));
    assert_eq!(rx.recv().await, Some(Notice::FatalNotFound));
}

#[tokio::test]
async fn reorder_moves_task_and_renumbers() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/lists/1/sort"))
        .and(body_json(json!({ "order": [2, 3, 1] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    store.reorder_within_list(ListId::from(1), 0, 2).await.unwrap();

    assert_eq!(positions(&store, 1), vec![(2, 0), (3, 1), (1, 2)]);
}

#[tokio::test]
async fn reorder_rejection_restores_prior_order() {
    let server = MockServer::start().await;
    let (store, mut rx) = loaded_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/lists/1/sort"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = store
        .reorder_within_list(ListId::from(1), 0, 2)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Api { status: 500, .. }));
    assert_eq!(positions(&store, 1), vec![(1, 0), (2, 1), (3, 2)]);
    assert!(matches!(rx.recv().await, Some(Notice::Error(_))));
}

#[tokio::test]
async fn reorder_with_invalid_index_never_calls_backend() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    let err = store
        .reorder_within_list(ListId::from(1), 7, 0)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::IndexOutOfBounds { index: 7, len: 3 }));
    assert_eq!(positions(&store, 1), vec![(1, 0), (2, 1), (3, 2)]);
}

#[tokio::test]
async fn move_across_lists_renumbers_both_lists() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/tasks/1/list"))
        .and(body_json(json!({ "listId": 2, "position": 0 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    store
        .move_across_lists(ListId::from(1), ListId::from(2), TaskId::from(1), 0)
        .await
        .unwrap();

    assert_eq!(positions(&store, 1), vec![(2, 0), (3, 1)]);
    assert_eq!(positions(&store, 2), vec![(1, 0)]);

    let moved = store.lists()[1].tasks[0].clone();
    assert_eq!(moved.list_id, ListId::from(2));
}

#[tokio::test]
async fn move_rejection_restores_exact_prior_snapshot() {
    let server = MockServer::start().await;
    let (store, mut rx) = loaded_store(&server).await;

    let before = store.lists();

    Mock::given(method("PATCH"))
        .and(path("/tasks/1/list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    store
        .move_across_lists(ListId::from(1), ListId::from(2), TaskId::from(1), 0)
        .await
        .unwrap_err();

    assert_eq!(store.lists(), before);
    assert!(matches!(rx.recv().await, Some(Notice::Error(_))));
}

#[tokio::test]
async fn same_list_move_to_last_slot_succeeds() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/tasks/1/list"))
        .and(body_json(json!({ "listId": 1, "position": 2 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    store
        .move_across_lists(ListId::from(1), ListId::from(1), TaskId::from(1), 2)
        .await
        .unwrap();

    assert_eq!(positions(&store, 1), vec![(2, 0), (3, 1), (1, 2)]);
}

#[tokio::test]
async fn same_list_move_past_end_fails_fast() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    // The task leaves the list before reinsertion, so index len is
    // already past the end for a same-list move.
    let err = store
        .move_across_lists(ListId::from(1), ListId::from(1), TaskId::from(1), 3)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::IndexOutOfBounds { index: 3, .. }));
    assert_eq!(positions(&store, 1), vec![(1, 0), (2, 1), (3, 2)]);

    // The store stays usable; nothing was left locked or poisoned
    store.reset_selection();
    assert_eq!(positions(&store, 1), vec![(1, 0), (2, 1), (3, 2)]);
}

#[tokio::test]
async fn delete_task_is_optimistic_and_rolls_back_in_place() {
    let server = MockServer::start().await;
    let (store, mut rx) = loaded_store(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let before = store.lists();
    store.delete_task(TaskId::from(1)).await.unwrap_err();

    // Restored at its prior index, not re-appended at the end
    assert_eq!(store.lists(), before);
    assert_eq!(positions(&store, 1), vec![(1, 0), (2, 1), (3, 2)]);
    assert!(matches!(rx.recv().await, Some(Notice::Error(_))));
}

#[tokio::test]
async fn delete_task_confirmed_stays_removed() {
    let server = MockServer::start().await;
    let (store, mut rx) = loaded_store(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/tasks/2"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    store.delete_task(TaskId::from(2)).await.unwrap();

    assert_eq!(positions(&store, 1), vec![(1, 0), (3, 1)]);
    assert!(matches!(rx.recv().await, Some(Notice::Info(_))));
}

#[tokio::test]
async fn create_list_appends_server_response() {
    let server = MockServer::start().await;
    let (store, mut rx) = loaded_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/boards/1/lists"))
        .and(body_json(json!({ "title": "Review" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 3, "title": "Review", "tasks": [] })),
        )
        .mount(&server)
        .await;

    store.create_list(BoardId::from(1), "Review").await.unwrap();

    let lists = store.lists();
    assert_eq!(lists.len(), 3);
    assert_eq!(lists[2].title, "Review");
    assert!(matches!(rx.recv().await, Some(Notice::Success(_))));
}

#[tokio::test]
async fn create_task_appends_from_result_envelope() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/lists/2/task"))
        .and(body_json(json!({ "title": "Ship it" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": task_json(50, 2, "Ship it", 0) })),
        )
        .mount(&server)
        .await;

    store.create_task(ListId::from(2), "Ship it").await.unwrap();

    assert_eq!(positions(&store, 2), vec![(50, 0)]);
}

#[tokio::test]
async fn rename_list_applies_server_confirmed_title() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    // The server normalizes the title; the store must apply what came back
    Mock::given(method("PATCH"))
        .and(path("/lists/1/title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": "In Progress" })))
        .mount(&server)
        .await;

    store.rename_list(ListId::from(1), "in progress").await.unwrap();

    assert_eq!(store.lists()[0].title, "In Progress");
}

#[tokio::test]
async fn delete_list_removed_only_after_confirmation() {
    let server = MockServer::start().await;
    let (store, mut rx) = loaded_store(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/lists/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    store.delete_list(ListId::from(2)).await.unwrap_err();
    assert_eq!(store.lists().len(), 2);
    assert!(matches!(rx.recv().await, Some(Notice::Error(_))));
}

#[tokio::test]
async fn fetch_priorities_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/priorities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "id": 1, "value": "High" },
                { "id": 2, "value": "Low" },
            ]
        })))
        .mount(&server)
        .await;

    let (store, _rx) = store_for(&server);

    store.fetch_priorities().await.unwrap();
    let first = store.priorities();

    store.fetch_priorities().await.unwrap();
    assert_eq!(store.priorities(), first);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn priority_label_is_value_copied_at_assignment() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    Mock::given(method("GET"))
        .and(path("/priorities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": 1, "value": "High" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/1/priority"))
        .and(body_json(json!({ "priority": 1 })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    store.fetch_priorities().await.unwrap();
    store
        .update_task_priority(TaskId::from(1), PriorityId::from(1))
        .await
        .unwrap();

    let task = store.lists()[0].tasks[0].clone();
    assert_eq!(task.priority.as_deref(), Some("High"));

    // Renaming the priority in the lookup set does not relabel the task
    Mock::given(method("GET"))
        .and(path("/priorities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": 1, "value": "Urgent" }]
        })))
        .mount(&server)
        .await;
    store.fetch_priorities().await.unwrap();

    let task = store.lists()[0].tasks[0].clone();
    assert_eq!(task.priority.as_deref(), Some("High"));
}

#[tokio::test]
async fn unknown_priority_fails_before_any_call() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    let err = store
        .update_task_priority(TaskId::from(1), PriorityId::from(42))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::PriorityNotFound { .. }));
}

#[tokio::test]
async fn select_task_fills_panel_then_field_updates_reach_it() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    Mock::given(method("GET"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(1, 1, "t1", 0)))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/1/description"))
        .and(body_json(json!({ "description": "details" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    store.select_task(TaskId::from(1)).await.unwrap();
    let selected = store.selected_task();
    assert!(selected.visible);
    assert!(!selected.loading);
    assert_eq!(selected.info.as_ref().unwrap().id, TaskId::from(1));

    store
        .update_task_description(TaskId::from(1), "details")
        .await
        .unwrap();

    let selected = store.selected_task();
    assert_eq!(
        selected.info.as_ref().unwrap().description.as_deref(),
        Some("details")
    );
    assert_eq!(
        store.lists()[0].tasks[0].description.as_deref(),
        Some("details")
    );

    store.reset_selection();
    assert!(!store.selected_task().visible);
}

#[tokio::test]
async fn second_structural_command_on_guarded_list_fails_fast() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/lists/1/sort"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;

    let slow = store.reorder_within_list(ListId::from(1), 0, 2);
    let contender = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.reorder_within_list(ListId::from(1), 1, 0).await
    };

    let (first, second) = tokio::join!(slow, contender);
    first.unwrap();
    assert!(matches!(
        second.unwrap_err(),
        SyncError::MutationInFlight { .. }
    ));

    // Only the first reorder landed
    assert_eq!(positions(&store, 1), vec![(2, 0), (3, 1), (1, 2)]);
}

#[tokio::test]
async fn command_completing_after_reset_is_a_noop() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(board_json())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let (store, _rx) = store_for(&server);
    let store = Arc::new(store);

    let fetcher = {
        let store = store.clone();
        tokio::spawn(async move { store.fetch_board(BoardId::from(1)).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    store.reset_board();

    fetcher.await.unwrap().unwrap();

    // The fetch landed after the view reset, so nothing was mutated
    assert_eq!(store.board_id(), BoardId::from(0));
    assert!(store.lists().is_empty());
}

#[tokio::test]
async fn dispatch_runs_commands_exhaustively() {
    let server = MockServer::start().await;
    let (store, _rx) = loaded_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/lists/1/sort"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    store
        .dispatch(Command::ReorderWithinList {
            list_id: ListId::from(1),
            from_index: 0,
            to_index: 2,
        })
        .await
        .unwrap();
    store.dispatch(Command::ResetBoard).await.unwrap();

    assert!(store.lists().is_empty());
}
