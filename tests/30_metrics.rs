mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use common::{meal, TestServer};

async fn metrics(server: &TestServer, cookie: &str) -> Result<Value> {
    let res = server
        .client
        .get(server.url("/meals/metrics"))
        .header(header::COOKIE, cookie)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "metrics failed: {}", res.status());
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn get_meal_metrics() -> Result<()> {
    let server = TestServer::spawn().await?;
    let cookie = server.register("Test", "test@test.com").await?;

    server.create_meal(&cookie, meal("Test", true, "2024-05-15")).await?;
    server.create_meal(&cookie, meal("Test 2", false, "2024-05-16")).await?;

    assert_eq!(
        metrics(&server, &cookie).await?,
        json!({
            "totalMeals": 2,
            "totalMealsOnDiet": 1,
            "totalMealsOffDiet": 1,
            "bestOnDietSequence": 1
        })
    );
    Ok(())
}

#[tokio::test]
async fn empty_history_has_zero_metrics() -> Result<()> {
    let server = TestServer::spawn().await?;
    let cookie = server.register("Test", "test@test.com").await?;

    assert_eq!(
        metrics(&server, &cookie).await?,
        json!({
            "totalMeals": 0,
            "totalMealsOnDiet": 0,
            "totalMealsOffDiet": 0,
            "bestOnDietSequence": 0
        })
    );
    Ok(())
}

#[tokio::test]
async fn streak_follows_dates_not_insertion_order() -> Result<()> {
    let server = TestServer::spawn().await?;
    let cookie = server.register("Test", "test@test.com").await?;

    // By date: 10 on, 11 on, 12 off, 13 on, 14 on, 15 on
    for (day, on_diet) in [(13, true), (10, true), (15, true), (12, false), (11, true), (14, true)] {
        let status = server
            .create_meal(&cookie, meal("Meal", on_diet, &format!("2024-05-{}", day)))
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let body = metrics(&server, &cookie).await?;
    assert_eq!(body["totalMeals"], 6);
    assert_eq!(body["totalMealsOnDiet"], 5);
    assert_eq!(body["totalMealsOffDiet"], 1);
    assert_eq!(body["bestOnDietSequence"], 3);
    Ok(())
}

#[tokio::test]
async fn metrics_only_count_the_session_user() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.register("Alice", "alice@test.com").await?;
    let bob = server.register("Bob", "bob@test.com").await?;

    server.create_meal(&alice, meal("A1", true, "2024-05-15")).await?;
    server.create_meal(&alice, meal("A2", true, "2024-05-16")).await?;
    server.create_meal(&bob, meal("B1", false, "2024-05-15")).await?;

    let body = metrics(&server, &alice).await?;
    assert_eq!(body["totalMeals"], 2);
    assert_eq!(body["bestOnDietSequence"], 2);

    let body = metrics(&server, &bob).await?;
    assert_eq!(body["totalMeals"], 1);
    assert_eq!(body["totalMealsOffDiet"], 1);
    assert_eq!(body["bestOnDietSequence"], 0);
    Ok(())
}

#[tokio::test]
async fn updating_a_meal_changes_the_streak() -> Result<()> {
    let server = TestServer::spawn().await?;
    let cookie = server.register("Test", "test@test.com").await?;

    server.create_meal(&cookie, meal("Day 1", true, "2024-05-01")).await?;
    server.create_meal(&cookie, meal("Day 2", false, "2024-05-02")).await?;
    server.create_meal(&cookie, meal("Day 3", true, "2024-05-03")).await?;
    assert_eq!(metrics(&server, &cookie).await?["bestOnDietSequence"], 1);

    let meals = server.list_meals(&cookie).await?;
    let off_diet = meals
        .iter()
        .find(|m| m["name"] == "Day 2")
        .and_then(|m| m["id"].as_str())
        .unwrap_or_default()
        .to_string();

    let res = server
        .client
        .put(server.url(&format!("/meals/{}", off_diet)))
        .header(header::COOKIE, &cookie)
        .json(&meal("Day 2", true, "2024-05-02"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert_eq!(metrics(&server, &cookie).await?["bestOnDietSequence"], 3);
    Ok(())
}
