//! Integration tests for `Store` against a mocked larder service.

use std::sync::Arc;
use std::time::Duration;

use larder_core::api::ErrorKind;
use larder_core::cache::CacheManager;
use larder_core::{ApiClient, ApiError, Ingredient, Snapshot, StaticToken, Store, TokenProvider};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn store_for(server: &MockServer, ttl: chrono::Duration) -> Store {
    let api = ApiClient::new(&format!("{}/api/", server.uri()), Duration::from_secs(5))
        .expect("mock server URI is a valid base URL");
    Store::new(api, Arc::new(StaticToken::new(TOKEN)), CacheManager::new(ttl))
}

async fn setup() -> (MockServer, Store) {
    let server = MockServer::start().await;
    let store = store_for(&server, chrono::Duration::minutes(5));
    (server, store)
}

fn names<T>(snapshot: &Snapshot<T>, name: impl Fn(&T) -> &str) -> Vec<String> {
    snapshot.items.iter().map(|i| name(i).to_string()).collect()
}

fn catalog_body() -> Value {
    json!({
        "common_ingredients": [{"name": "Milk", "type": "Dairy"}, {"name": "eggs", "type": "Dairy"}],
        "custom_ingredients": [{"name": "Almond Milk", "type": "Dairy"}]
    })
}

fn lists_body() -> Value {
    json!([
        {"list_name": "Groceries", "ingredients": [
            {"ingredient_name": "Milk", "ingredient_type": "Dairy", "amount": 1.0, "unit": "l", "is_custom_ingredient": false},
            {"ingredient_name": "Almond Milk", "ingredient_type": "Dairy", "amount": 2.0, "unit": "l", "is_custom_ingredient": true}
        ]},
        {"list_name": "Pantry", "ingredients": [
            {"ingredient_name": "Almond Milk", "ingredient_type": "Dairy", "amount": 1.0, "unit": "l", "is_custom_ingredient": true}
        ]}
    ])
}

fn recipes_body() -> Value {
    json!([
        {"recipe_name": "Smoothie",
         "ingredients": [{"ingredient_name": "Almond Milk", "ingredient_type": "Dairy", "amount": 1.0, "unit": "cup", "is_custom_ingredient": true}],
         "steps": ["Peel banana", "Add milk", "Blend", "Serve"]}
    ])
}

async fn mount_get(server: &MockServer, route: &str, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

fn milk(amount: f64) -> Ingredient {
    Ingredient::new("Milk", "Dairy", false).with_amount(amount, "l")
}

// ============================================================================
// Reads and freshness
// ============================================================================

#[tokio::test]
async fn test_catalog_merges_sorts_and_serves_from_cache() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/ingredients", catalog_body(), 1).await;

    let first = store.get_all_ingredients().await;
    assert!(first.is_ok());
    assert_eq!(names(&first, |i| &i.name), vec!["Almond Milk", "eggs", "Milk"]);
    assert!(first.items[0].is_custom);
    assert!(!first.items[2].is_custom);

    // Within the freshness window: no second request (expect(1) verifies on drop)
    let second = store.get_all_ingredients().await;
    assert_eq!(second.items, first.items);

    let search = store.search_catalog("milk").await;
    assert_eq!(names(&search, |i| &i.name), vec!["Almond Milk", "Milk"]);
}

#[tokio::test]
async fn test_stale_collection_is_refetched() {
    let server = MockServer::start().await;
    let store = store_for(&server, chrono::Duration::zero());
    mount_get(&server, "/api/units", json!([{"unit": "cup"}, {"unit": "g"}]), 2).await;

    assert_eq!(store.get_measurement_units().await.items, vec!["cup", "g"]);
    assert_eq!(store.get_measurement_units().await.items, vec!["cup", "g"]);
}

#[tokio::test]
async fn test_empty_collection_is_refetched() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/lists", json!([]), 2).await;

    assert!(store.get_my_lists().await.items.is_empty());
    assert!(store.get_my_lists().await.items.is_empty());
}

#[tokio::test]
async fn test_failed_refresh_keeps_cached_snapshot() {
    let server = MockServer::start().await;
    let store = store_for(&server, chrono::Duration::zero());
    Mock::given(method("GET"))
        .and(path("/api/recipes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipes_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recipes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let first = store.get_all_recipes().await;
    assert!(first.is_ok());

    let second = store.get_all_recipes().await;
    let err = second.refresh_error.as_ref().expect("refresh should fail");
    assert_eq!(err.kind(), ErrorKind::Status);
    assert_eq!(second.items, first.items);
}

#[tokio::test]
async fn test_decode_failure_is_reported() {
    let (server, store) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let snapshot = store.get_my_lists().await;
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.refresh_error.map(|e| e.kind()), Some(ErrorKind::Decode));
    assert!(!store.cache().state().await.lists.is_populated());
}

#[tokio::test]
async fn test_catalog_accepts_any_success_status() {
    let (server, store) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/ingredients"))
        .respond_with(ResponseTemplate::new(203).set_body_json(catalog_body()))
        .mount(&server)
        .await;

    assert_eq!(store.get_all_ingredients().await.items.len(), 3);
}

#[tokio::test]
async fn test_transport_failure() {
    let api = ApiClient::new("http://127.0.0.1:1/api/", Duration::from_secs(2))
        .expect("valid base URL");
    let store = Store::new(api, Arc::new(StaticToken::new(TOKEN)), CacheManager::default());

    let snapshot = store.get_my_lists().await;
    assert_eq!(snapshot.into_result().map_err(|e| e.kind()).err(), Some(ErrorKind::Transport));
}

struct LockedKeychain;

impl TokenProvider for LockedKeychain {
    fn bearer_token(&self) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("keychain locked"))
    }
}

#[tokio::test]
async fn test_missing_token_makes_no_request() {
    let server = MockServer::start().await;
    let api = ApiClient::new(&format!("{}/api/", server.uri()), Duration::from_secs(5))
        .expect("valid base URL");
    let store = Store::new(api, Arc::new(LockedKeychain), CacheManager::default());
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = store.create_user().await.expect_err("no token available");
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.to_string().contains("keychain locked"));
}

// ============================================================================
// List mutations
// ============================================================================

#[tokio::test]
async fn test_add_ingredient_merges_by_identity() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/lists", lists_body(), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/lists/ingredients"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "list_name": "Groceries",
            "ingredient": "Milk",
            "ingredient_type": "Dairy",
            "amount": 2.5,
            "unit": "l",
            "is_custom_ingredient": false
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    store.get_my_lists().await;
    store
        .add_ingredient_to_list("Groceries", milk(2.5))
        .await
        .expect("add should succeed");

    let lists = store.get_my_lists().await.items;
    let groceries = &lists[0];
    assert_eq!(groceries.len(), 2);
    assert_eq!(groceries.get(&milk(0.0).key()).map(|i| i.amount), Some(3.5));
}

#[tokio::test]
async fn test_mutation_on_unfetched_lists_takes_server_state() {
    let (server, store) = setup().await;
    let eggs = Ingredient::new("Eggs", "Dairy", false).with_amount(12.0, "");
    let after_add = json!([
        {"list_name": "Pantry", "ingredients": [
            {"ingredient_name": "Eggs", "ingredient_type": "Dairy", "amount": 12.0, "unit": "", "is_custom_ingredient": false}
        ]}
    ]);
    mount_get(&server, "/api/lists", after_add, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/lists/ingredients"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    store
        .add_ingredient_to_list("Pantry", eggs.clone())
        .await
        .expect("add should succeed");

    let requests = server.received_requests().await.expect("request recording is on");
    assert_eq!(requests[0].method.as_str(), "POST");
    assert_eq!(requests[1].method.as_str(), "GET");

    // Fetched after the add, so the server's copy is not merged into again.
    // Lists are now fresh: this read must not hit the server.
    let lists = store.get_my_lists().await.items;
    assert_eq!(lists[0].len(), 1);
    assert_eq!(lists[0].get(&eggs.key()).map(|i| i.amount), Some(12.0));
}

/// Answer every mutating request with a failure each mutator rejects.
async fn mount_rejections(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
    // Editing expects exactly 200
    Mock::given(method("PATCH"))
        .and(path("/api/lists/ingredients"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/lists/ingredients/move"))
        .respond_with(ResponseTemplate::new(409))
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400))
        .mount(server)
        .await;
}

async fn attempt_every_mutation(store: &Store) -> Vec<Result<(), ApiError>> {
    let almond = Ingredient::new("Almond Milk", "Dairy", true).with_amount(1.0, "l");
    vec![
        store.add_ingredient_to_list("Groceries", milk(1.0)).await,
        store.remove_ingredient_from_list("Groceries", &milk(1.0)).await,
        store.set_ingredient("Groceries", &milk(1.0), 3.0, "l").await,
        store.move_ingredient("Groceries", &milk(1.0), "Pantry", milk(1.0)).await,
        store.create_list("Weekly Shop").await,
        store.delete_list("Groceries").await,
        store.rename_list("Pantry", "Cupboard").await,
        store.create_recipe("Pancakes").await,
        store.delete_recipe("Smoothie").await,
        store.add_ingredient_to_recipe("Smoothie", milk(1.0)).await,
        store.delete_ingredient_in_recipe("Smoothie", &almond).await,
        store.add_step_to_recipe("Smoothie", "Enjoy").await,
        store.delete_step_from_recipe("Smoothie", 1).await,
        store.create_custom_ingredient("Oat Milk", "Dairy").await,
        store.delete_custom_ingredient("Almond Milk", "Dairy").await,
    ]
}

#[tokio::test]
async fn test_failed_mutations_leave_cached_collections_untouched() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/lists", lists_body(), 1).await;
    mount_get(&server, "/api/ingredients", catalog_body(), 1).await;
    mount_get(&server, "/api/recipes", recipes_body(), 1).await;
    mount_rejections(&server).await;

    store.get_my_lists().await;
    store.get_all_ingredients().await;
    store.get_all_recipes().await;
    let before = store.cache().state().await;

    let err = store
        .add_ingredient_to_list("Groceries", milk(1.0))
        .await
        .expect_err("server rejects the add");
    assert_eq!(err.kind(), ErrorKind::Status);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));

    let results = attempt_every_mutation(&store).await;
    assert_eq!(results.len(), 15);
    for result in &results {
        let err = result.as_ref().expect_err("every mutation is rejected");
        assert_eq!(err.kind(), ErrorKind::Status);
    }

    assert_eq!(store.cache().state().await, before);
}

#[tokio::test]
async fn test_failed_mutations_leave_unfetched_collections_unfetched() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/lists", lists_body(), 0).await;
    mount_get(&server, "/api/ingredients", catalog_body(), 0).await;
    mount_get(&server, "/api/recipes", recipes_body(), 0).await;
    mount_rejections(&server).await;

    let before = store.cache().state().await;
    let results = attempt_every_mutation(&store).await;
    assert!(results.iter().all(Result::is_err));

    let after = store.cache().state().await;
    assert_eq!(after, before);
    assert!(!after.lists.is_populated());
    assert!(!after.catalog.is_populated());
    assert!(!after.recipes.is_populated());
}

#[tokio::test]
async fn test_remove_and_set_ingredient() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/lists", lists_body(), 1).await;
    Mock::given(method("DELETE"))
        .and(path("/api/lists/ingredients"))
        .and(query_param("ingredient", "Almond Milk"))
        .and(query_param("is_custom_ingredient", "true"))
        .and(query_param("list_name", "Groceries"))
        .and(query_param("unit", "l"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/lists/ingredients"))
        .and(body_partial_json(json!({
            "list_name": "Groceries",
            "old_ingredient": "Milk",
            "old_amount": 1.0,
            "new_ingredient": "Milk",
            "new_amount": 4.0,
            "new_unit": "cup"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let lists = store.get_my_lists().await.items;
    let almond = lists[0].ingredients[1].clone();
    let current_milk = lists[0].ingredients[0].clone();

    store
        .remove_ingredient_from_list("Groceries", &almond)
        .await
        .expect("remove should succeed");
    store
        .set_ingredient("Groceries", &current_milk, 4.0, "cup")
        .await
        .expect("edit should succeed");

    let lists = store.get_my_lists().await.items;
    assert_eq!(lists[0].len(), 1);
    assert_eq!(lists[0].ingredients[0].amount, 4.0);
    assert_eq!(lists[0].ingredients[0].unit, "cup");
    // The other list still has its own copy
    assert!(lists[1].contains(&almond.key()));
}

#[tokio::test]
async fn test_edit_expects_exactly_200() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/lists", lists_body(), 1).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    store.get_my_lists().await;
    let err = store
        .set_ingredient("Groceries", &milk(1.0), 2.0, "l")
        .await
        .expect_err("204 is not the expected status");
    assert_eq!(err.kind(), ErrorKind::Status);
    assert_eq!(store.get_my_lists().await.items[0].ingredients[0].amount, 1.0);
}

#[tokio::test]
async fn test_move_ingredient_between_lists() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/lists", lists_body(), 1).await;
    Mock::given(method("PATCH"))
        .and(path("/api/lists/ingredients/move"))
        .and(body_partial_json(json!({
            "old_list_name": "Groceries",
            "old_ingredient": "Milk",
            "new_list_name": "Pantry",
            "new_ingredient": "Milk",
            "new_amount": 1.0
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store.get_my_lists().await;
    store
        .move_ingredient("Groceries", &milk(1.0), "Pantry", milk(1.0))
        .await
        .expect("move should succeed");

    let lists = store.get_my_lists().await.items;
    assert!(!lists[0].contains(&milk(0.0).key()));
    assert!(lists[1].contains(&milk(0.0).key()));
    assert_eq!(lists[1].len(), 2);
}

#[tokio::test]
async fn test_create_delete_rename_list() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/lists", lists_body(), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/lists/Groceries"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/lists/Weekly%20Shop"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/lists/Pantry"))
        .and(body_partial_json(json!({"new_list_name": "Cupboard"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/lists/Groceries"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    store.get_my_lists().await;

    // Duplicate name: remote call still made, cache unchanged
    store.create_list("Groceries").await.expect("create should succeed");
    assert_eq!(store.get_my_lists().await.items.len(), 2);

    store.create_list("Weekly Shop").await.expect("create should succeed");
    store.rename_list("Pantry", "Cupboard").await.expect("rename should succeed");
    store.delete_list("Groceries").await.expect("delete should succeed");

    let lists = store.get_my_lists().await;
    assert_eq!(names(&lists, |l| &l.name), vec!["Cupboard", "Weekly Shop"]);
    assert!(lists.items[1].is_empty());
}

#[tokio::test]
async fn test_concurrent_adds_are_not_lost() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/lists", lists_body(), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/lists/ingredients"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(50)))
        .expect(3)
        .mount(&server)
        .await;

    store.get_my_lists().await;
    let results = futures::future::join_all((0..3).map(|_| store.add_ingredient_to_list("Groceries", milk(1.0)))).await;
    assert!(results.iter().all(Result::is_ok));

    let lists = store.get_my_lists().await.items;
    assert_eq!(lists[0].get(&milk(0.0).key()).map(|i| i.amount), Some(4.0));
}

// ============================================================================
// Custom ingredients
// ============================================================================

#[tokio::test]
async fn test_delete_custom_ingredient_cascades_into_lists_only() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/ingredients", catalog_body(), 1).await;
    mount_get(&server, "/api/lists", lists_body(), 1).await;
    mount_get(&server, "/api/recipes", recipes_body(), 1).await;
    Mock::given(method("DELETE"))
        .and(path("/api/ingredients/custom/Almond%20Milk"))
        .and(query_param("type", "Dairy"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    store.get_all_ingredients().await;
    store.get_my_lists().await;
    store.get_all_recipes().await;

    store
        .delete_custom_ingredient("Almond Milk", "Dairy")
        .await
        .expect("delete should succeed");

    let catalog = store.get_all_ingredients().await;
    assert_eq!(names(&catalog, |i| &i.name), vec!["eggs", "Milk"]);

    let almond = Ingredient::new("Almond Milk", "Dairy", true).key();
    let lists = store.get_my_lists().await.items;
    assert!(lists.iter().all(|l| !l.contains(&almond)));
    assert_eq!(lists[0].len(), 1);
    assert!(lists[1].is_empty());

    // Recipes are deliberately left alone
    let recipes = store.get_all_recipes().await.items;
    assert!(recipes[0].ingredients.contains(&almond));
}

#[tokio::test]
async fn test_create_custom_ingredient_inserts_sorted() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/ingredients", catalog_body(), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/ingredients/custom"))
        .and(body_partial_json(json!({"ingredient": "Buttermilk", "type": "Dairy"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    store.get_all_ingredients().await;
    store
        .create_custom_ingredient("Buttermilk", "Dairy")
        .await
        .expect("create should succeed");

    let catalog = store.get_all_ingredients().await;
    assert_eq!(names(&catalog, |i| &i.name), vec!["Almond Milk", "Buttermilk", "eggs", "Milk"]);
    assert!(catalog.items[1].is_custom);
}

// ============================================================================
// Recipes
// ============================================================================

#[tokio::test]
async fn test_recipe_steps_stay_contiguous() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/recipes", recipes_body(), 1).await;
    Mock::given(method("DELETE"))
        .and(path("/api/recipes/steps"))
        .and(query_param("recipe_name", "Smoothie"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/recipes/steps"))
        .and(body_partial_json(json!({"recipe_name": "Smoothie", "step": "Enjoy"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    store.get_all_recipes().await;
    store.delete_step_from_recipe("Smoothie", 2).await.expect("delete should succeed");
    store.add_step_to_recipe("Smoothie", "Enjoy").await.expect("add should succeed");
    // Out of range: the server answers, the cached steps stay as they are
    store.delete_step_from_recipe("Smoothie", 9).await.expect("server accepted");

    let recipes = store.get_all_recipes().await.items;
    assert_eq!(recipes[0].steps, vec!["Peel banana", "Blend", "Serve", "Enjoy"]);
}

#[tokio::test]
async fn test_recipe_lifecycle() {
    let (server, store) = setup().await;
    mount_get(&server, "/api/recipes", recipes_body(), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/recipes/Pancakes"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/recipes/ingredients"))
        .and(body_partial_json(json!({"recipe_name": "Pancakes", "ingredient": "Milk", "amount": 1.0})))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/recipes/ingredients"))
        .and(query_param("recipe_name", "Smoothie"))
        .and(query_param("ingredient", "Almond Milk"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/recipes/Smoothie"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store.get_all_recipes().await;
    store.create_recipe("Pancakes").await.expect("create should succeed");
    store.add_ingredient_to_recipe("Pancakes", milk(1.0)).await.expect("add should succeed");
    store.add_ingredient_to_recipe("Pancakes", milk(1.0)).await.expect("add should succeed");

    let almond = Ingredient::new("Almond Milk", "Dairy", true);
    store
        .delete_ingredient_in_recipe("Smoothie", &almond)
        .await
        .expect("delete should succeed");

    let recipes = store.get_all_recipes().await.items;
    assert_eq!(recipes.len(), 2);
    assert!(recipes[0].ingredients.is_empty());
    assert_eq!(recipes[1].name, "Pancakes");
    assert_eq!(recipes[1].ingredients.len(), 1);
    assert_eq!(recipes[1].ingredients.ingredients[0].amount, 2.0);

    store.delete_recipe("Smoothie").await.expect("delete should succeed");
    let recipes = store.get_all_recipes().await;
    assert_eq!(names(&recipes, |r| &r.name), vec!["Pancakes"]);
}

#[tokio::test]
async fn test_create_user_expects_created() {
    let (server, store) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let err = store.create_user().await.expect_err("200 is not 201");
    assert_eq!(err.kind(), ErrorKind::Status);
}
